use crate::error::{Result, TaxaError};
use crate::types::{PeptideTaxa, Rank, TaxonId};
use crate::utils::cache::LineageCache;
use crate::vendor::TaxonomyClient;
use std::collections::BTreeSet;
use tracing::info;

/// Rewrites every taxon of every peptide to its ancestor at `rank`, in place.
///
/// Lineages for all referenced taxa are resolved up front in one call, so a communication
/// failure aborts before any peptide is touched. Taxa without an ancestor at `rank` are
/// dropped; a peptide whose taxa all lack one ends up with an empty set. Peptides whose
/// taxa diverge at `rank` keep every distinct ancestor.
pub fn normalize_taxa<C>(
    peptide_taxa: &mut PeptideTaxa,
    rank: Rank,
    cache: &mut LineageCache,
    client: &C,
) -> Result<()>
where
    C: TaxonomyClient + ?Sized,
{
    let all_taxa: BTreeSet<TaxonId> = peptide_taxa.values().flatten().copied().collect();
    info!(
        "Mapping {} distinct taxa of {} peptides onto rank {}",
        all_taxa.len(),
        peptide_taxa.len(),
        rank
    );

    let lineages = cache.resolve(client, &all_taxa)?;

    for taxa in peptide_taxa.values_mut() {
        let mut normalized = BTreeSet::new();
        for taxon in taxa.iter() {
            let lineage = lineages
                .get(taxon)
                .ok_or(TaxaError::MissingLineage(*taxon))?;
            if let Some(ancestor) = lineage.at(rank) {
                normalized.insert(ancestor);
            }
        }
        *taxa = normalized;
    }

    Ok(())
}
