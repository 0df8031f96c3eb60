use crate::types::TaxonId;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaxaError>;

#[derive(Debug, Error)]
pub enum TaxaError {
    #[error("Communication with {endpoint} failed: {message}")]
    Communication { endpoint: String, message: String },

    #[error("No lineage could be resolved for taxon {0}")]
    MissingLineage(TaxonId),

    #[error("All peptides have zero weight, cannot sample")]
    AllZeroWeight,

    #[error("Unknown NCBI rank: {0}")]
    UnknownRank(String),

    #[error("No score or PSM count available for peptide {0}")]
    MissingEvidence(String),

    #[error("RBO persistence must lie in (0, 1], got {0}")]
    InvalidPersistence(f64),

    #[error("No grid search results to select parameters from")]
    NoGridResults,

    #[error("File name does not encode alpha, beta and prior: {}", .0.display())]
    InvalidParameterFile(PathBuf),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TaxaError {
    pub(crate) fn communication(endpoint: &str, message: impl Into<String>) -> Self {
        TaxaError::Communication {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }
}
