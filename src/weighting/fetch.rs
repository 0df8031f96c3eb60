use crate::error::Result;
use crate::types::{PeptideTaxa, Rank, TaxonId};
use crate::vendor::TaxonomyClient;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

/// Looks up the candidate taxa of every peptide and keeps only those that descend (at `rank`
/// or deeper) from one of `query_taxa`.
///
/// Peptides the client knows nothing about are absent from the result; peptides whose taxa
/// are all filtered out are kept with an empty set.
pub fn fetch_peptides_and_filter_taxa<C>(
    peptides: &[String],
    query_taxa: &[TaxonId],
    rank: Rank,
    client: &C,
) -> Result<PeptideTaxa>
where
    C: TaxonomyClient + ?Sized,
{
    let peptide_taxa = client.get_taxa_for_peptides(peptides)?;
    info!(
        "Retrieved taxa for {} of {} peptides",
        peptide_taxa.len(),
        peptides.len()
    );

    let allowed: HashSet<TaxonId> = client.get_descendants(query_taxa, rank)?;
    info!(
        "Filtering on {} descendants of {:?} at rank {} or below",
        allowed.len(),
        query_taxa,
        rank
    );

    Ok(peptide_taxa
        .into_iter()
        .map(|(peptide, taxa)| {
            let kept: BTreeSet<TaxonId> = taxa.into_iter().filter(|t| allowed.contains(t)).collect();
            (peptide, kept)
        })
        .collect())
}
