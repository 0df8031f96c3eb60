use super::aggregate::WeightTables;
use crate::types::TaxonId;
use std::collections::HashSet;
use tracing::info;

/// Below this many distinct taxa the tables are passed on untouched.
pub const MIN_TAXA_FOR_CUTOFF: usize = 50;

/// Keeps the `max_taxa` heaviest taxa plus every unique taxon, filtering both tables.
///
/// Unique taxa come from `tables.unique_taxa`, so peptide rows of a unique
/// [`UNCLASSIFIED_TAXON`](super::aggregate::UNCLASSIFIED_TAXON) survive even though it has no
/// row in `tables.taxa`.
///
/// Relies on `tables.taxa` already being in descending `scaled_weight` order, as produced by
/// [`aggregate_weights`](super::aggregate::aggregate_weights); ties are resolved by that order.
pub fn select_top_taxa(tables: WeightTables, max_taxa: usize) -> WeightTables {
    if tables.distinct_taxa() < MIN_TAXA_FOR_CUTOFF {
        info!(
            "Only {} taxa present, keeping all of them",
            tables.distinct_taxa()
        );
        return tables;
    }

    let mut keep: HashSet<TaxonId> = tables.taxa.iter().take(max_taxa).map(|t| t.taxon).collect();
    let top = keep.len();
    keep.extend(tables.unique_taxa.iter().copied());

    info!(
        "Selected {} of {} taxa ({} by weight, {} more by unique evidence)",
        keep.len(),
        tables.distinct_taxa(),
        top,
        keep.len() - top
    );

    let WeightTables {
        peptides,
        taxa,
        unique_taxa,
    } = tables;
    WeightTables {
        peptides: peptides.into_iter().filter(|row| keep.contains(&row.taxon)).collect(),
        taxa: taxa.into_iter().filter(|t| keep.contains(&t.taxon)).collect(),
        unique_taxa,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Evidence, PeptideEvidence, PeptideTaxa};
    use crate::weighting::aggregate::{aggregate_weights, IdentityCorrection, PeptideRow, TaxonWeight, UNCLASSIFIED_TAXON};

    fn tables(weights: &[(TaxonId, f64, bool)]) -> WeightTables {
        let mut taxa: Vec<TaxonWeight> = weights
            .iter()
            .map(|&(taxon, w, unique)| TaxonWeight {
                taxon,
                log_weight: w,
                scaled_weight: w,
                unique,
            })
            .collect();
        taxa.sort_by(|a, b| b.scaled_weight.total_cmp(&a.scaled_weight));

        let peptides = weights
            .iter()
            .map(|&(taxon, w, _)| PeptideRow {
                sequence: format!("PEP{}K", taxon),
                score: 0.9,
                psms: 1,
                taxon,
                weight: w,
                log_weight: w,
            })
            .collect();

        let unique_taxa = weights.iter().filter(|w| w.2).map(|w| w.0).collect();
        WeightTables {
            peptides,
            taxa,
            unique_taxa,
        }
    }

    fn many(count: usize) -> Vec<(TaxonId, f64, bool)> {
        (0..count).map(|i| (i as TaxonId + 1, (count - i) as f64, false)).collect()
    }

    #[test]
    fn test_small_problems_are_untouched() {
        let input = tables(&many(49));
        let output = select_top_taxa(input.clone(), 2);
        assert_eq!(output, input);
        assert_eq!(output.distinct_taxa(), 49);
    }

    #[test]
    fn test_cutoff_keeps_heaviest() {
        let output = select_top_taxa(tables(&many(51)), 10);
        assert_eq!(output.distinct_taxa(), 10);
        assert_eq!(output.ranking(), (1..=10).collect::<Vec<TaxonId>>());
        assert_eq!(output.peptides.len(), 10);
        assert!(output.peptides.iter().all(|row| row.taxon <= 10));
    }

    #[test]
    fn test_unique_taxa_survive_cutoff() {
        let mut weights = vec![(1, 10.0, false), (2, 8.0, false), (3, 5.0, true)];
        weights.extend((4..60).map(|taxon| (taxon, 1.0, false)));
        let output = select_top_taxa(tables(&weights), 2);

        assert_eq!(output.ranking(), vec![1, 2, 3]);
        assert!(output.taxa.iter().find(|t| t.taxon == 3).unwrap().unique);
        let peptide_taxa: HashSet<TaxonId> = output.peptides.iter().map(|r| r.taxon).collect();
        assert_eq!(peptide_taxa, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_unique_taxa_far_below_cutoff_survive() {
        let mut weights = many(80);
        weights[79].2 = true;
        let output = select_top_taxa(tables(&weights), 5);
        assert_eq!(output.distinct_taxa(), 6);
        assert!(output.ranking().contains(&80));
    }

    #[test]
    fn test_unique_unclassified_peptides_survive_cutoff() {
        let mut peptide_taxa = PeptideTaxa::new();
        let mut evidence = PeptideEvidence::new();
        let mut add = |sequence: String, taxon: TaxonId, psm_count: u32| {
            peptide_taxa.insert(sequence.clone(), [taxon].into_iter().collect());
            evidence.insert(
                sequence,
                Evidence {
                    score: 0.9,
                    psm_count,
                },
            );
        };
        // 60 weighted taxa, each with one peptide of its own.
        for taxon in 1..=60 {
            add(format!("UNIQUE{}K", taxon), taxon, 100 - taxon as u32);
        }
        add("UNCLASSIFIEDK".to_string(), UNCLASSIFIED_TAXON, 1);

        let tables = aggregate_weights(&peptide_taxa, &evidence, &IdentityCorrection).unwrap();
        assert_eq!(tables.distinct_taxa(), 60);

        let output = select_top_taxa(tables, 10);
        // Every taxon here is unique, so nothing is cut.
        assert_eq!(output.distinct_taxa(), 60);
        let kept: Vec<&PeptideRow> = output
            .peptides
            .iter()
            .filter(|row| row.taxon == UNCLASSIFIED_TAXON)
            .collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].sequence, "UNCLASSIFIEDK");
        assert!(output.taxa.iter().all(|t| t.taxon != UNCLASSIFIED_TAXON));
    }

    #[test]
    fn test_unique_unclassified_alongside_shared_taxa() {
        let mut weights = many(60);
        weights[0].2 = true;
        let mut input = tables(&weights);
        input.peptides.push(PeptideRow {
            sequence: "UNCLASSIFIEDK".to_string(),
            score: 0.5,
            psms: 3,
            taxon: UNCLASSIFIED_TAXON,
            weight: 3.0,
            log_weight: 4f64.log10(),
        });
        input.unique_taxa.insert(UNCLASSIFIED_TAXON);

        let output = select_top_taxa(input, 5);
        assert_eq!(output.ranking(), (1..=5).collect::<Vec<TaxonId>>());
        let peptide_taxa: HashSet<TaxonId> = output.peptides.iter().map(|r| r.taxon).collect();
        assert_eq!(peptide_taxa, HashSet::from([1, 2, 3, 4, 5, UNCLASSIFIED_TAXON]));
    }
}
