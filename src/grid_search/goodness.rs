use super::rbo::rank_biased_overlap;
use crate::error::Result;
use crate::types::TaxonId;
use std::collections::HashMap;

/// Shannon entropy (natural log) of `values` after normalising them to sum to one.
///
/// Zero and negative entries contribute nothing; an all-zero vector has entropy 0.
pub fn shannon_entropy(values: &[f64]) -> f64 {
    let total: f64 = values.iter().filter(|&&v| v > 0.0).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let mut h = 0.0;
    for &v in values {
        if v > 0.0 {
            let p = v / total;
            h -= p * p.ln();
        }
    }
    h
}

/// Taxa ordered by descending score; equal scores are ordered by ascending taxon ID.
pub fn rank_by_score(taxon_scores: &HashMap<TaxonId, f64>) -> Vec<(TaxonId, f64)> {
    let mut ranked: Vec<(TaxonId, f64)> = taxon_scores.iter().map(|(&t, &s)| (t, s)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
}

/// `RBO(reference, posterior ranking) / entropy^2`.
///
/// Rewards posteriors that rank taxa like the independent weight ranking and that concentrate
/// their mass on few taxa. When the entropy is zero (or so small that the inverse overflows)
/// the entropy factor is capped at `f64::MAX`, so the result stays finite.
pub fn compute_goodness(
    taxon_scores: &HashMap<TaxonId, f64>,
    reference: &[TaxonId],
    persistence: f64,
) -> Result<f64> {
    let ranked = rank_by_score(taxon_scores);
    let (ids, scores): (Vec<TaxonId>, Vec<f64>) = ranked.into_iter().unzip();

    let entropy = shannon_entropy(&scores);
    let similarity = rank_biased_overlap(reference, &ids, persistence)?;

    let sharpness = 1.0 / (entropy * entropy);
    let sharpness = if sharpness.is_finite() { sharpness } else { f64::MAX };

    Ok(similarity * sharpness)
}
