//! Taxon normalization, evidence sampling, weight aggregation and top-taxa selection.

pub mod aggregate;
pub mod fetch;
pub mod normalize;
pub mod sampling;
pub mod select;

pub use aggregate::{
    aggregate_weights, degeneracy_weight, IdentityCorrection, PeptideRow, TaxonWeight, WeightCorrection,
    WeightTables, UNCLASSIFIED_TAXON,
};
pub use fetch::fetch_peptides_and_filter_taxa;
pub use normalize::normalize_taxa;
pub use sampling::weighted_random_sample;
pub use select::{select_top_taxa, MIN_TAXA_FOR_CUTOFF};

use crate::error::Result;
use crate::types::{PeptideEvidence, PeptideTaxa, Rank};
use crate::utils::cache::LineageCache;
use crate::vendor::TaxonomyClient;
use rand::Rng;
use tracing::info;

/// Upper bound on the number of peptides passed on to aggregation.
pub const DEFAULT_SAMPLE_SIZE: usize = 10000;

#[derive(Clone, Debug)]
pub struct WeighingOptions {
    pub taxa_rank: Rank,
    pub max_taxa: usize,
    pub sample_size: usize,
}

impl WeighingOptions {
    pub fn new(taxa_rank: Rank, max_taxa: usize) -> Self {
        Self {
            taxa_rank,
            max_taxa,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }
}

/// Runs the full weighting stage: normalize to `options.taxa_rank`, subsample, aggregate and
/// select the taxa that go into the graphical model.
///
/// `peptide_taxa` is normalized in place.
pub fn perform_taxa_weighing<C, R>(
    peptide_taxa: &mut PeptideTaxa,
    evidence: &PeptideEvidence,
    options: &WeighingOptions,
    cache: &mut LineageCache,
    client: &C,
    rng: &mut R,
) -> Result<WeightTables>
where
    C: TaxonomyClient + ?Sized,
    R: Rng + ?Sized,
{
    normalize_taxa(peptide_taxa, options.taxa_rank, cache, client)?;

    let sampled = weighted_random_sample(peptide_taxa, options.sample_size, rng)?;
    info!("Using {} sequences as input", sampled.len());

    let tables = aggregate_weights(&sampled, evidence, &IdentityCorrection)?;
    Ok(select_top_taxa(tables, options.max_taxa))
}
