use crate::error::{Result, TaxaError};
use crate::types::{PeptideEvidence, PeptideTaxa, TaxonId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// NCBI "unclassified" bucket (taxon 1869227), never reported as a weighted taxon.
pub const UNCLASSIFIED_TAXON: TaxonId = 1869227;

/// One peptide-taxon edge, carrying the peptide's evidence and degeneracy-penalised weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeptideRow {
    pub sequence: String,
    pub score: f64,
    pub psms: u32,
    pub taxon: TaxonId,
    pub weight: f64,
    pub log_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonWeight {
    pub taxon: TaxonId,
    pub log_weight: f64,
    pub scaled_weight: f64,
    pub unique: bool,
}

/// Output of the weighting stage.
///
/// `taxa` is ordered by descending `scaled_weight`; equal weights keep ascending taxon order.
/// `unique_taxa` holds every taxon that is the only taxon of some peptide, including
/// [`UNCLASSIFIED_TAXON`], which never appears in `taxa`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTables {
    pub peptides: Vec<PeptideRow>,
    pub taxa: Vec<TaxonWeight>,
    pub unique_taxa: BTreeSet<TaxonId>,
}

impl WeightTables {
    pub fn distinct_taxa(&self) -> usize {
        self.taxa.len()
    }

    /// Taxon IDs in reference order (descending `scaled_weight`).
    pub fn ranking(&self) -> Vec<TaxonId> {
        self.taxa.iter().map(|t| t.taxon).collect()
    }
}

/// Correction applied to a taxon's summed log weight to obtain its scaled weight.
///
/// This is where a proteome-size normalisation plugs in; [`IdentityCorrection`] leaves the
/// weight untouched.
pub trait WeightCorrection {
    fn correct(&self, taxon: TaxonId, log_weight: f64) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCorrection;

impl WeightCorrection for IdentityCorrection {
    fn correct(&self, _taxon: TaxonId, log_weight: f64) -> f64 {
        log_weight
    }
}

/// `psm_count / |taxa|^3`: peptides shared by many taxa contribute steeply less.
pub fn degeneracy_weight(psm_count: u32, taxa_count: usize) -> f64 {
    if taxa_count == 0 {
        return 0.0;
    }
    psm_count as f64 / (taxa_count as f64).powi(3)
}

/// Computes per-peptide and per-taxon weights for a normalized peptide-taxa mapping.
///
/// Every taxon that is the only taxon of some peptide is flagged `unique`. Contributions of a
/// peptide are duplicated over all of its taxa and summed per taxon. [`UNCLASSIFIED_TAXON`] is
/// removed from the taxon table when present.
pub fn aggregate_weights(
    peptide_taxa: &PeptideTaxa,
    evidence: &PeptideEvidence,
    correction: &dyn WeightCorrection,
) -> Result<WeightTables> {
    let unique_taxa: BTreeSet<TaxonId> = peptide_taxa
        .values()
        .filter(|taxa| taxa.len() == 1)
        .flat_map(|taxa| taxa.iter().copied())
        .collect();

    let mut peptides = Vec::new();
    let mut summed: BTreeMap<TaxonId, f64> = BTreeMap::new();

    for (sequence, taxa) in peptide_taxa {
        let ev = evidence
            .get(sequence)
            .ok_or_else(|| TaxaError::MissingEvidence(sequence.clone()))?;

        let weight = degeneracy_weight(ev.psm_count, taxa.len());
        let log_weight = (weight + 1.0).log10();

        for &taxon in taxa {
            *summed.entry(taxon).or_insert(0.0) += log_weight;
            peptides.push(PeptideRow {
                sequence: sequence.clone(),
                score: ev.score,
                psms: ev.psm_count,
                taxon,
                weight,
                log_weight,
            });
        }
    }

    let mut taxa: Vec<TaxonWeight> = summed
        .into_iter()
        .map(|(taxon, log_weight)| TaxonWeight {
            taxon,
            log_weight,
            scaled_weight: correction.correct(taxon, log_weight),
            unique: unique_taxa.contains(&taxon),
        })
        .collect();
    // Stable, so ties keep ascending taxon order.
    taxa.sort_by(|a, b| b.scaled_weight.total_cmp(&a.scaled_weight));

    let before = taxa.len();
    taxa.retain(|t| t.taxon != UNCLASSIFIED_TAXON);
    if taxa.len() != before {
        debug!("Removed unclassified taxon {} from taxon weights", UNCLASSIFIED_TAXON);
    }

    debug!(
        "Aggregated {} peptide-taxon rows into {} taxa ({} unique)",
        peptides.len(),
        taxa.len(),
        taxa.iter().filter(|t| t.unique).count()
    );

    Ok(WeightTables {
        peptides,
        taxa,
        unique_taxa,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Evidence;

    fn fixture() -> (PeptideTaxa, PeptideEvidence) {
        let peptide_taxa: PeptideTaxa = [
            ("AAAK", vec![10]),
            ("CCCK", vec![10, 20]),
            ("DDDK", vec![20, 30, 40]),
            ("EEEK", vec![30]),
        ]
        .into_iter()
        .map(|(p, taxa)| (p.to_string(), taxa.into_iter().collect()))
        .collect();

        let evidence: PeptideEvidence = [("AAAK", 9), ("CCCK", 16), ("DDDK", 27), ("EEEK", 1)]
            .into_iter()
            .map(|(p, psms)| {
                (
                    p.to_string(),
                    Evidence {
                        score: 0.9,
                        psm_count: psms,
                    },
                )
            })
            .collect();

        (peptide_taxa, evidence)
    }

    #[test]
    fn test_degeneracy_weight() {
        assert_eq!(degeneracy_weight(9, 1), 9.0);
        assert_eq!(degeneracy_weight(16, 2), 2.0);
        assert_eq!(degeneracy_weight(27, 3), 1.0);
        assert_eq!(degeneracy_weight(5, 0), 0.0);
    }

    #[test]
    fn test_aggregate_weights() {
        let (peptide_taxa, evidence) = fixture();
        let tables = aggregate_weights(&peptide_taxa, &evidence, &IdentityCorrection).unwrap();

        // One row per peptide-taxon edge.
        assert_eq!(tables.peptides.len(), 1 + 2 + 3 + 1);
        assert!(tables.peptides.iter().all(|row| row.log_weight >= 0.0));

        let weight_of = |taxon: TaxonId| {
            tables
                .taxa
                .iter()
                .find(|t| t.taxon == taxon)
                .map(|t| t.scaled_weight)
                .unwrap()
        };
        assert!((weight_of(10) - (1.0 + 3f64.log10())).abs() < 1e-12);
        assert!((weight_of(20) - (3f64.log10() + 2f64.log10())).abs() < 1e-12);
        assert!((weight_of(30) - (2f64.log10() + 2f64.log10())).abs() < 1e-12);
        assert!((weight_of(40) - 2f64.log10()).abs() < 1e-12);

        assert_eq!(tables.ranking(), vec![10, 20, 30, 40]);

        let unique: Vec<TaxonId> = tables.taxa.iter().filter(|t| t.unique).map(|t| t.taxon).collect();
        assert_eq!(unique.len(), 2);
        assert!(unique.contains(&10));
        assert!(unique.contains(&30));
    }

    #[test]
    fn test_mass_is_conserved() {
        let (peptide_taxa, evidence) = fixture();
        let tables = aggregate_weights(&peptide_taxa, &evidence, &IdentityCorrection).unwrap();

        let rows: f64 = tables.peptides.iter().map(|r| r.log_weight).sum();
        let taxa: f64 = tables.taxa.iter().map(|t| t.scaled_weight).sum();
        assert!((rows - taxa).abs() < 1e-9);
    }

    #[test]
    fn test_unclassified_taxon_is_dropped() {
        let (mut peptide_taxa, mut evidence) = fixture();
        peptide_taxa.insert("GGGK".to_string(), [UNCLASSIFIED_TAXON].into_iter().collect());
        evidence.insert(
            "GGGK".to_string(),
            Evidence {
                score: 0.5,
                psm_count: 100,
            },
        );

        let tables = aggregate_weights(&peptide_taxa, &evidence, &IdentityCorrection).unwrap();
        assert!(tables.taxa.iter().all(|t| t.taxon != UNCLASSIFIED_TAXON));
        assert_eq!(tables.distinct_taxa(), 4);

        // Still recorded as unique, and its peptide row is kept.
        assert_eq!(tables.unique_taxa, BTreeSet::from([10, 30, UNCLASSIFIED_TAXON]));
        assert!(tables.peptides.iter().any(|row| row.taxon == UNCLASSIFIED_TAXON));
    }

    #[test]
    fn test_correction_is_applied() {
        struct Halve;
        impl WeightCorrection for Halve {
            fn correct(&self, _taxon: TaxonId, log_weight: f64) -> f64 {
                log_weight / 2.0
            }
        }

        let (peptide_taxa, evidence) = fixture();
        let tables = aggregate_weights(&peptide_taxa, &evidence, &Halve).unwrap();
        for taxon in &tables.taxa {
            assert!((taxon.scaled_weight - taxon.log_weight / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_missing_evidence_fails() {
        let (peptide_taxa, mut evidence) = fixture();
        evidence.remove("CCCK");
        assert!(matches!(
            aggregate_weights(&peptide_taxa, &evidence, &IdentityCorrection),
            Err(TaxaError::MissingEvidence(seq)) if seq == "CCCK"
        ));
    }
}
