//! Sampling primitives consumed by the screen generator and win calculators.
//!
//! - [`AliasTable`] / [`LookupTable`] — O(1)-pick weighted index selection.
//! - [`weighted_shuffle`] / [`weighted_shuffle_filtered`] — full weighted
//!   permutations (Efraimidis-Spirakis A-ExpJ).
//! - [`weighted_sample`] — top-`k` weighted reservoir sampling (A-Res).
//! - [`WeightedTable`] — picks LUT when total weight `<=`
//!   [`problab_core::LUT_WEIGHT_CAP`], AliasTable otherwise.
mod alias;
mod lookup;
mod reservoir;
mod shuffle;

pub use alias::AliasTable;
pub use lookup::LookupTable;
pub use reservoir::weighted_sample;
pub use shuffle::{weighted_shuffle, weighted_shuffle_filtered};

use problab_core::{ProblabError, LUT_WEIGHT_CAP};
use problab_prng::Prng;

/// A weighted index table, backed by whichever of [`LookupTable`] /
/// [`AliasTable`] the selection rule prefers for the given weights. Both
/// variants present the same `pick` interface so callers never need to
/// branch on which one they got.
#[derive(Debug, Clone)]
pub enum WeightedTable {
    Lut(LookupTable),
    Alias(AliasTable),
}

impl WeightedTable {
    /// Builds the table using the cheaper representation: a [`LookupTable`]
    /// (one PRNG draw per pick) if the total weight is small enough to
    /// materialize cheaply, an [`AliasTable`] (two draws per pick, O(n)
    /// memory) otherwise.
    pub fn build(weights: &[i64]) -> Result<Self, ProblabError> {
        let total: i128 = weights.iter().map(|&w| w as i128).sum();
        if total >= 0 && (total as u128) <= LUT_WEIGHT_CAP as u128 {
            Ok(Self::Lut(LookupTable::build(weights)?))
        } else {
            Ok(Self::Alias(AliasTable::build(weights)?))
        }
    }

    pub fn pick(&self, prng: &mut impl Prng) -> usize {
        match self {
            Self::Lut(t) => t.pick(prng),
            Self::Alias(t) => t.pick(prng),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Lut(t) => t.len(),
            Self::Alias(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Lut(t) => t.is_empty(),
            Self::Alias(t) => t.is_empty(),
        }
    }
}
