pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod grid_search;
pub mod io;
pub mod types;
pub mod utils;
pub mod vendor;
pub mod weighting;

pub use error::{Result, TaxaError};
pub use grid_search::{compute_goodness, rank_biased_overlap, select_best_parameters, GridResult, ParameterSet};
pub use types::{Evidence, Lineage, PeptideEvidence, PeptideTaxa, Rank, TaxonId};
pub use weighting::{perform_taxa_weighing, WeighingOptions, WeightTables};
