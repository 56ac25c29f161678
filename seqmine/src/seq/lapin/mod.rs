pub mod exist_table;
pub mod mining;

#[cfg(test)]
mod tests;

pub use exist_table::ItemIsExistTable;
pub use mining::lapin_spam_algorithm;
