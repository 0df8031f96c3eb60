use crate::error::{Result, TaxaError};
use crate::types::PeptideTaxa;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Sampling weight of a peptide: the inverse of its number of candidate taxa.
pub fn peptide_weight(taxa_count: usize) -> f64 {
    if taxa_count == 0 {
        0.0
    } else {
        1.0 / taxa_count as f64
    }
}

/// Draws `min(n, #peptides with taxa)` peptides without replacement, each with probability
/// proportional to [`peptide_weight`].
///
/// Peptides without taxa are never drawn. If no peptide has a non-zero weight this fails with
/// [`TaxaError::AllZeroWeight`] rather than returning an empty sample.
pub fn weighted_random_sample<R>(peptide_taxa: &PeptideTaxa, n: usize, rng: &mut R) -> Result<PeptideTaxa>
where
    R: Rng + ?Sized,
{
    let candidates: Vec<(&String, f64)> = peptide_taxa
        .iter()
        .map(|(peptide, taxa)| (peptide, peptide_weight(taxa.len())))
        .filter(|(_, weight)| *weight > 0.0)
        .collect();

    let total_weight: f64 = candidates.iter().map(|(_, weight)| weight).sum();
    if candidates.is_empty() || total_weight <= 0.0 {
        return Err(TaxaError::AllZeroWeight);
    }

    let amount = n.min(candidates.len());
    debug!(
        "Sampling {} of {} peptides with taxa ({} peptides in total)",
        amount,
        candidates.len(),
        peptide_taxa.len()
    );

    let chosen = candidates
        .choose_multiple_weighted(rng, amount, |(_, weight)| weight / total_weight)
        .map_err(|e| TaxaError::InvalidRecord(format!("invalid sampling weights: {}", e)))?;

    Ok(chosen
        .map(|(peptide, _)| ((*peptide).clone(), peptide_taxa[*peptide].clone()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeSet;

    fn peptides(entries: &[(&str, &[i32])]) -> PeptideTaxa {
        entries
            .iter()
            .map(|(peptide, taxa)| (peptide.to_string(), taxa.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_sample_size_is_bounded_by_weighted_peptides() {
        let input = peptides(&[
            ("AAK", &[1]),
            ("CCK", &[1, 2]),
            ("DDK", &[]),
            ("EEK", &[3, 4, 5]),
            ("FFK", &[]),
        ]);
        let mut rng = StdRng::seed_from_u64(7);

        for n in 0..6 {
            let sample = weighted_random_sample(&input, n, &mut rng).unwrap();
            assert_eq!(sample.len(), n.min(3));
            assert!(!sample.contains_key("DDK"));
            assert!(!sample.contains_key("FFK"));
            for (peptide, taxa) in &sample {
                assert_eq!(&input[peptide], taxa);
            }
        }
    }

    #[test]
    fn test_sample_takes_everything_when_n_is_large() {
        let input = peptides(&[("AAK", &[1]), ("CCK", &[1, 2]), ("DDK", &[])]);
        let mut rng = StdRng::seed_from_u64(1);

        let sample = weighted_random_sample(&input, 10_000, &mut rng).unwrap();
        let keys: BTreeSet<&str> = sample.keys().map(String::as_str).collect();
        assert_eq!(keys, BTreeSet::from(["AAK", "CCK"]));
    }

    #[test]
    fn test_all_zero_weight_fails() {
        let input = peptides(&[("AAK", &[]), ("CCK", &[])]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            weighted_random_sample(&input, 1, &mut rng),
            Err(TaxaError::AllZeroWeight)
        ));

        let empty = PeptideTaxa::new();
        assert!(matches!(
            weighted_random_sample(&empty, 1, &mut rng),
            Err(TaxaError::AllZeroWeight)
        ));
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let input: PeptideTaxa = (0..200)
            .map(|i| {
                let taxa: BTreeSet<i32> = (0..(i % 7 + 1)).collect();
                (format!("PEPTIDE{}K", i), taxa)
            })
            .collect();

        let first = weighted_random_sample(&input, 25, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = weighted_random_sample(&input, 25, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 25);
    }

    #[test]
    fn test_fixed_seed_gives_known_sample() {
        let input = peptides(&[
            ("AAAK", &[1]),
            ("CCCK", &[1, 2]),
            ("DDDK", &[]),
            ("EEEK", &[3]),
            ("FFFK", &[1, 2, 3, 4]),
            ("GGGK", &[5]),
            ("HHHK", &[2, 4]),
        ]);

        let expected: [&[&str]; 4] = [
            &["EEEK"],
            &["AAAK", "EEEK"],
            &["AAAK", "CCCK", "EEEK"],
            &["AAAK", "CCCK", "EEEK", "HHHK"],
        ];
        for (n, keys) in (1..=4).zip(expected) {
            let sample = weighted_random_sample(&input, n, &mut StdRng::seed_from_u64(42)).unwrap();
            let sampled: Vec<&str> = sample.keys().map(String::as_str).collect();
            assert_eq!(sampled, keys, "sample of {} peptides", n);
        }
    }

    #[test]
    fn test_less_degenerate_peptides_are_preferred() {
        let mut input = peptides(&[("UNIQUEK", &[1])]);
        for i in 0..50 {
            input.insert(format!("SHARED{}K", i), (0..100).collect());
        }

        // UNIQUEK carries weight 1.0 against 0.5 for all shared peptides together.
        let hits = (0..300u64)
            .filter(|seed| {
                let sample = weighted_random_sample(&input, 1, &mut StdRng::seed_from_u64(*seed)).unwrap();
                sample.contains_key("UNIQUEK")
            })
            .count();
        assert!(hits > 150, "unique peptide drawn only {} times", hits);
    }
}
