use problab_prng::{Core, Prng};
use std::cmp::Ordering;

/// Efraimidis-Spirakis weighted shuffle (A-ExpJ): scores each element by
/// `Exp(1) / weight` and emits indices in ascending score order. A weight of
/// zero scores `+infinity`, so zero-weight elements always sort last.
pub fn weighted_shuffle<P: Prng>(core: &mut Core<P>, weights: &[f64]) -> Vec<usize> {
    let mut scored: Vec<(usize, f64)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let score = if w <= 0.0 {
                f64::INFINITY
            } else {
                core.exp_float64() / w
            };
            (i, score)
        })
        .collect();
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(i, _)| i).collect()
}

/// Like [`weighted_shuffle`] but drops zero-weight entries from the output
/// entirely, rather than sorting them to the back.
pub fn weighted_shuffle_filtered<P: Prng>(core: &mut Core<P>, weights: &[f64]) -> Vec<usize> {
    weighted_shuffle(core, weights)
        .into_iter()
        .filter(|&i| weights[i] > 0.0)
        .collect()
}
