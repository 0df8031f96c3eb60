//! Readers and writers for the tabular artifacts exchanged with the rest of the pipeline.

pub mod evidence;
pub mod grid;
pub mod tables;
