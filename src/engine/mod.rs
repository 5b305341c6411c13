pub mod assembler;
pub mod classifier;
pub mod tracker;
