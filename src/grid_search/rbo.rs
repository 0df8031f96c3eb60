use crate::error::{Result, TaxaError};
use std::collections::HashSet;
use std::hash::Hash;

/// Rank-biased overlap of two rankings, evaluated to the depth of the shorter one.
///
/// The agreement at depth `d` is the fraction of items shared by both top-`d` prefixes. With
/// `persistence < 1` the agreements are summed with weights `(1 - p) * p^(d-1)`, so shallow
/// ranks dominate and two identical rankings of length `k` score `1 - p^k`. With
/// `persistence == 1` every depth counts equally and the result is the average overlap.
///
/// Two empty rankings are identical (1.0); an empty ranking shares nothing with a non-empty
/// one (0.0). Items are expected to be distinct within each ranking.
pub fn rank_biased_overlap<T>(reference: &[T], candidate: &[T], persistence: f64) -> Result<f64>
where
    T: Eq + Hash,
{
    check_persistence(persistence)?;

    if reference.is_empty() && candidate.is_empty() {
        return Ok(1.0);
    }
    if reference.is_empty() || candidate.is_empty() {
        return Ok(0.0);
    }

    let depth = reference.len().min(candidate.len());
    let average = persistence == 1.0;

    let mut seen_reference: HashSet<&T> = HashSet::with_capacity(depth);
    let mut seen_candidate: HashSet<&T> = HashSet::with_capacity(depth);

    let mut overlap = 0usize;
    let mut score = 0.0;
    let mut weight = 1.0 - persistence;

    for d in 0..depth {
        let (r, c) = (&reference[d], &candidate[d]);
        if r == c {
            overlap += 1;
        } else {
            if seen_candidate.contains(r) {
                overlap += 1;
            }
            if seen_reference.contains(c) {
                overlap += 1;
            }
        }
        seen_reference.insert(r);
        seen_candidate.insert(c);

        let agreement = overlap as f64 / (d + 1) as f64;
        if average {
            score += (agreement - score) / (d + 1) as f64;
        } else {
            score += weight * agreement;
            weight *= persistence;
        }
    }

    Ok(score.clamp(0.0, 1.0))
}

/// Accepts persistence values in `(0, 1]`; NaN is rejected.
pub fn check_persistence(persistence: f64) -> Result<()> {
    if persistence > 0.0 && persistence <= 1.0 {
        Ok(())
    } else {
        Err(TaxaError::InvalidPersistence(persistence))
    }
}
