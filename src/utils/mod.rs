pub mod cache;
pub mod progress_bar_builder;
