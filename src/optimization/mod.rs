pub mod settlement;
pub mod simplify;
