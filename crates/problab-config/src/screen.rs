use crate::reel::WeightedReelSet;
use serde::{Deserialize, Serialize};

/// How the generator fills a column once a reel-set has been chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenStrategy {
    /// Pick one start index per column, fill rows from consecutive strip
    /// positions (preserves a strip's authored adjacency).
    ByReelIndex,
    /// Draw each cell independently from the strip's symbol weights.
    BySymbolWeight,
}

/// Static board dimensions and the candidate reel-sets a mode draws from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenSettings {
    pub columns: usize,
    pub rows: usize,
}

impl ScreenSettings {
    pub fn cells(&self) -> usize {
        self.columns * self.rows
    }
}

/// Generation-time configuration: dimensions, strategy, and the weighted
/// reel-set pool the generator selects from on each spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenScreenSettings {
    pub screen: ScreenSettings,
    pub strategy: GenStrategy,
    pub reel_sets: Vec<WeightedReelSet>,
}

impl GenScreenSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.reel_sets.is_empty() {
            return Err("mode must declare at least one reel-set".into());
        }
        for wrs in &self.reel_sets {
            wrs.reel_set.validate()?;
            if wrs.reel_set.columns() != self.screen.columns {
                return Err(format!(
                    "reel-set has {} columns, screen expects {}",
                    wrs.reel_set.columns(),
                    self.screen.columns
                ));
            }
            if wrs.weight < 0 {
                return Err("reel-set selection weight must be non-negative".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reel::{ReelSet, ReelStrip};

    fn strip() -> ReelStrip {
        ReelStrip {
            symbols: vec![0, 1, 2],
            weights: vec![1, 1, 1],
        }
    }

    #[test]
    fn validate_rejects_empty_reel_set_pool() {
        let settings = GenScreenSettings {
            screen: ScreenSettings { columns: 3, rows: 3 },
            strategy: GenStrategy::ByReelIndex,
            reel_sets: vec![],
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_rejects_column_count_mismatch() {
        let settings = GenScreenSettings {
            screen: ScreenSettings { columns: 2, rows: 3 },
            strategy: GenStrategy::ByReelIndex,
            reel_sets: vec![WeightedReelSet {
                reel_set: ReelSet {
                    strips: vec![strip()],
                },
                weight: 1,
            }],
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn validate_accepts_matching_config() {
        let settings = GenScreenSettings {
            screen: ScreenSettings { columns: 1, rows: 3 },
            strategy: GenStrategy::BySymbolWeight,
            reel_sets: vec![WeightedReelSet {
                reel_set: ReelSet {
                    strips: vec![strip()],
                },
                weight: 1,
            }],
        };
        assert!(settings.validate().is_ok());
    }
}
