use problab_core::{ProblabError, LUT_LENGTH_CAP};
use problab_prng::Prng;

/// Expands weights into a materialized array of repeated indices; `pick` is
/// one `IntN(total)` draw plus a dereference. Cheaper per-pick than
/// [`crate::AliasTable`] (one draw instead of two) but O(total weight)
/// memory, so it is capped at [`LUT_LENGTH_CAP`] entries.
#[derive(Debug, Clone)]
pub struct LookupTable {
    entries: Vec<usize>,
}

impl LookupTable {
    pub fn build(weights: &[i64]) -> Result<Self, ProblabError> {
        if weights.iter().any(|&w| w < 0) {
            return Err(ProblabError::MalformedRequest(
                "lookup table weights must be non-negative".into(),
            ));
        }
        let total: i128 = weights.iter().map(|&w| w as i128).sum();
        if total <= 0 {
            return Err(ProblabError::MalformedRequest(
                "lookup table weights must not all be zero".into(),
            ));
        }
        if total as u128 > LUT_LENGTH_CAP as u128 {
            return Err(ProblabError::MalformedRequest(format!(
                "lookup table total weight {total} exceeds cap {LUT_LENGTH_CAP}"
            )));
        }
        let mut entries = Vec::with_capacity(total as usize);
        for (i, &w) in weights.iter().enumerate() {
            entries.extend(std::iter::repeat(i).take(w as usize));
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pick(&self, prng: &mut impl Prng) -> usize {
        let i = prng.int_n(self.entries.len() as i64) as usize;
        self.entries[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use problab_prng::Pcg64;

    #[test]
    fn rejects_weight_exceeding_cap() {
        assert!(LookupTable::build(&[LUT_LENGTH_CAP as i64 + 1]).is_err());
    }

    #[test]
    fn empirical_distribution_matches_weights() {
        let weights = vec![10, 20, 30];
        let total: i64 = weights.iter().sum();
        let table = LookupTable::build(&weights).unwrap();
        assert_eq!(table.len() as i64, total);
        let mut rng = Pcg64::seed_from_i64(1);
        let trials = 300_000;
        let mut counts = [0u64; 3];
        for _ in 0..trials {
            counts[table.pick(&mut rng)] += 1;
        }
        for (i, &w) in weights.iter().enumerate() {
            let expected = w as f64 / total as f64;
            let observed = counts[i] as f64 / trials as f64;
            assert!((expected - observed).abs() < 0.01);
        }
    }

    /// LUT and AliasTable on the same stream should converge to the same
    /// empirical distribution, even though draw-by-draw sequences differ.
    #[test]
    fn parity_with_alias_table() {
        use crate::AliasTable;
        let weights = vec![5, 15, 25, 5];
        let total: i64 = weights.iter().sum();
        let lut = LookupTable::build(&weights).unwrap();
        let alias = AliasTable::build(&weights).unwrap();
        let mut rng_lut = Pcg64::seed_from_i64(2);
        let mut rng_alias = Pcg64::seed_from_i64(2);
        let trials = 300_000;
        let mut lut_counts = [0u64; 4];
        let mut alias_counts = [0u64; 4];
        for _ in 0..trials {
            lut_counts[lut.pick(&mut rng_lut)] += 1;
            alias_counts[alias.pick(&mut rng_alias)] += 1;
        }
        for i in 0..4 {
            let expected = weights[i] as f64 / total as f64;
            let lut_observed = lut_counts[i] as f64 / trials as f64;
            let alias_observed = alias_counts[i] as f64 / trials as f64;
            assert!((lut_observed - alias_observed).abs() < 0.02);
            assert!((lut_observed - expected).abs() < 0.01);
        }
    }
}
