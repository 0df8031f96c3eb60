//! Scoring of solver outputs produced under different parameter sets, and selection of the
//! best performing set.

pub mod goodness;
pub mod rbo;

pub use goodness::{compute_goodness, rank_by_score, shannon_entropy};
pub use rbo::{check_persistence, rank_biased_overlap};

use crate::error::{Result, TaxaError};
use crate::types::TaxonId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use tracing::info;

/// Default RBO persistence used when comparing posterior and weight rankings.
pub const DEFAULT_RBO_PERSISTENCE: f64 = 0.9;

/// Noise and prior parameters of one solver run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub alpha: f64,
    pub beta: f64,
    pub prior: f64,
}

impl ParameterSet {
    pub fn new(alpha: f64, beta: f64, prior: f64) -> Self {
        Self { alpha, beta, prior }
    }
}

impl fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alpha={} beta={} prior={}", self.alpha, self.beta, self.prior)
    }
}

/// Posterior taxon scores of one solver run, with the parameters that produced them.
#[derive(Debug, Clone)]
pub struct GridResult {
    pub taxon_scores: HashMap<TaxonId, f64>,
    pub params: ParameterSet,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridEvaluation {
    pub params: ParameterSet,
    pub goodness: f64,
}

impl GridEvaluation {
    /// Orders by `(goodness, alpha, beta, prior)`, comparing each field in turn.
    fn cmp_key(&self, other: &Self) -> Ordering {
        self.goodness
            .total_cmp(&other.goodness)
            .then(self.params.alpha.total_cmp(&other.params.alpha))
            .then(self.params.beta.total_cmp(&other.params.beta))
            .then(self.params.prior.total_cmp(&other.params.prior))
    }
}

/// Computes the goodness of every result against the reference ranking.
///
/// Fails with [`TaxaError::InvalidPersistence`] unless `persistence` lies in `(0, 1]`.
pub fn evaluate_grid(
    results: &[GridResult],
    reference: &[TaxonId],
    persistence: f64,
) -> Result<Vec<GridEvaluation>> {
    check_persistence(persistence)?;

    results
        .iter()
        .map(|result| {
            let goodness = compute_goodness(&result.taxon_scores, reference, persistence)?;
            info!("Goodness for {}: {}", result.params, goodness);
            Ok(GridEvaluation {
                params: result.params,
                goodness,
            })
        })
        .collect()
}

/// Returns the parameter set with the highest goodness.
///
/// Equal goodness values fall back to the larger `alpha`, then `beta`, then `prior`.
pub fn select_best_parameters(
    results: &[GridResult],
    reference: &[TaxonId],
    persistence: f64,
) -> Result<ParameterSet> {
    evaluate_grid(results, reference, persistence)?
        .into_iter()
        .max_by(|a, b| a.cmp_key(b))
        .map(|best| {
            info!("Best parameters: {} (goodness {})", best.params, best.goodness);
            best.params
        })
        .ok_or(TaxaError::NoGridResults)
}
