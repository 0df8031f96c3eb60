pub mod best_parameters;
pub mod fetch_taxa;
pub mod show_config;
pub mod weigh;
