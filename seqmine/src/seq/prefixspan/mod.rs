pub mod mining;
pub mod projected;
pub mod pseudo;


pub use mining::prefixspan_algorithm;
pub use projected::{LocalItems, ProjectedDatabase, ProjectionMode};
pub use pseudo::PseudoSequence;
