pub mod mining;


pub use mining::spam_algorithm;
