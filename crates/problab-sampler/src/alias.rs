use problab_core::ProblabError;
use problab_prng::Prng;

/// Vose's alias method over integer weights: O(n) build, O(1) pick (two
/// PRNG draws). Preferred over [`crate::LookupTable`] once the total weight
/// exceeds [`problab_core::LUT_WEIGHT_CAP`], since its memory is O(n) rather
/// than O(total weight).
#[derive(Debug, Clone)]
pub struct AliasTable {
    /// Per-slot acceptance threshold, in `[0, total]`.
    prob: Vec<i64>,
    /// Per-slot alias index, used when the threshold draw misses.
    alias: Vec<usize>,
    /// Total weight `S`.
    total: i64,
}

impl AliasTable {
    /// Builds a table from non-negative integer weights. Rejects a negative
    /// weight, an all-zero weight vector, or a `total * n` product that
    /// overflows `i64`.
    pub fn build(weights: &[i64]) -> Result<Self, ProblabError> {
        let n = weights.len();
        if weights.iter().any(|&w| w < 0) {
            return Err(ProblabError::MalformedRequest(
                "alias table weights must be non-negative".into(),
            ));
        }
        let total: i128 = weights.iter().map(|&w| w as i128).sum();
        if total <= 0 {
            return Err(ProblabError::MalformedRequest(
                "alias table weights must not all be zero".into(),
            ));
        }
        let total_i64 = i64::try_from(total).map_err(|_| {
            ProblabError::MalformedRequest("alias table total weight overflows i64".into())
        })?;
        let scaled_max = total.checked_mul(n as i128).ok_or_else(|| {
            ProblabError::MalformedRequest("alias table total * n overflows".into())
        })?;
        if i64::try_from(scaled_max).is_err() {
            return Err(ProblabError::MalformedRequest(
                "alias table total * n overflows i64".into(),
            ));
        }

        // scaled[i] = w[i] * n
        let mut scaled: Vec<i64> = weights.iter().map(|&w| w * n as i64).collect();
        let mut small: Vec<usize> = Vec::new();
        let mut large: Vec<usize> = Vec::new();
        for (i, &s) in scaled.iter().enumerate() {
            if s < total_i64 {
                small.push(i);
            } else {
                large.push(i);
            }
        }

        let mut prob = vec![0i64; n];
        let mut alias = vec![0usize; n];

        while let (Some(s), Some(l)) = (small.pop(), large.pop()) {
            prob[s] = scaled[s];
            alias[s] = l;
            scaled[l] = scaled[l] + scaled[s] - total_i64;
            if scaled[l] < total_i64 {
                small.push(l);
            } else {
                large.push(l);
            }
        }
        // With exact integer arithmetic one stack always empties first and
        // this loop is a no-op; draining both anyway keeps every slot's
        // probability set even if that invariant is ever violated.
        for i in large.into_iter().chain(small.into_iter()) {
            prob[i] = total_i64;
        }

        Ok(Self {
            prob,
            alias,
            total: total_i64,
        })
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    /// Draws an index with probability proportional to its original weight.
    pub fn pick(&self, prng: &mut impl Prng) -> usize {
        let i = prng.int_n(self.prob.len() as i64) as usize;
        if prng.int_n(self.total) < self.prob[i] {
            i
        } else {
            self.alias[i]
        }
    }
}
