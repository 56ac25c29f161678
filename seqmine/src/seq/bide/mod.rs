pub mod closure;
pub mod mining;


pub use closure::{back_scan, backward_extension_check};
pub use mining::bide_algorithm;
