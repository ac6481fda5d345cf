use problab_core::SymbolId;
use serde::{Deserialize, Serialize};

/// One cyclic column of symbols with a parallel weight vector. Positions
/// wrap modulo `symbols.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelStrip {
    pub symbols: Vec<SymbolId>,
    pub weights: Vec<i64>,
}

impl ReelStrip {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.symbols.len() != self.weights.len() {
            return Err(format!(
                "reel strip symbol/weight length mismatch: {} vs {}",
                self.symbols.len(),
                self.weights.len()
            ));
        }
        if self.symbols.is_empty() {
            return Err("reel strip must not be empty".into());
        }
        Ok(())
    }

    /// Symbol at cyclic position `s + row`.
    pub fn at(&self, start: usize, row: usize) -> SymbolId {
        self.symbols[(start + row) % self.symbols.len()]
    }
}

/// An ordered sequence of strips, one per column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelSet {
    pub strips: Vec<ReelStrip>,
}

impl ReelSet {
    pub fn columns(&self) -> usize {
        self.strips.len()
    }

    pub fn validate(&self) -> Result<(), String> {
        for strip in &self.strips {
            strip.validate()?;
        }
        Ok(())
    }
}

/// A reel-set together with its selection weight among the mode's
/// alternative reel-sets (e.g. base game vs. free-spin strips).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedReelSet {
    pub reel_set: ReelSet,
    pub weight: i64,
}
