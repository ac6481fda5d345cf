use problab_core::{SymbolId, MAX_SYMBOLS};
use serde::{Deserialize, Serialize};

/// A symbol's capability class. Wildness, payability, and scatter-ness are
/// derived bitmasks over a mode's symbol table, not stored per-symbol flags,
/// so a single `u64` mask answers "is symbol `s` a member" in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolType {
    None,
    Special,
    Scatter,
    Wild,
    High,
    Low,
}

/// One symbol's static definition: its type and its pay-table row (a
/// non-decreasing sequence of payouts indexed by run length). Rows are
/// equal length across every symbol in a mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolDef {
    pub id: SymbolId,
    pub symbol_type: SymbolType,
    /// Payout at run-length `i+1`, relative to one bet unit.
    pub pay_table: Vec<i64>,
}

/// The full symbol table for one game mode. Cardinality must not exceed
/// [`MAX_SYMBOLS`] so membership tests fit in a single `u64` mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    pub symbols: Vec<SymbolDef>,
}

impl SymbolTable {
    /// Validates the cardinality bound, that pay-table rows share one
    /// length, and that ids are dense and in order (`symbols[i].id == i`).
    /// Call this once at mode-build time; downstream code indexes pay
    /// tables and count arrays by id, assuming it equals position.
    pub fn validate(&self) -> Result<(), String> {
        if self.symbols.len() > MAX_SYMBOLS {
            return Err(format!(
                "symbol table has {} symbols, exceeds cap of {MAX_SYMBOLS}",
                self.symbols.len()
            ));
        }
        let width = self.symbols.first().map(|s| s.pay_table.len());
        if let Some(width) = width {
            if self.symbols.iter().any(|s| s.pay_table.len() != width) {
                return Err("pay table rows must all share one length".into());
            }
        }
        for (i, s) in self.symbols.iter().enumerate() {
            if s.id as usize != i {
                return Err(format!(
                    "symbol ids must be dense and in order: expected {i} at position {i}, found {}",
                    s.id
                ));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: SymbolId) -> Option<&SymbolDef> {
        self.symbols.iter().find(|s| s.id == id)
    }

    /// Bitmask of symbols whose type is `Wild`.
    pub fn wild_mask(&self) -> u64 {
        self.mask_of(SymbolType::Wild)
    }

    /// Bitmask of symbols with at least one non-zero pay-table entry.
    pub fn payable_mask(&self) -> u64 {
        self.symbols
            .iter()
            .filter(|s| s.pay_table.iter().any(|&p| p != 0))
            .fold(0u64, |acc, s| acc | (1u64 << s.id))
    }

    /// Bitmask of symbols whose type is `Scatter`.
    pub fn scatter_mask(&self) -> u64 {
        self.mask_of(SymbolType::Scatter)
    }

    fn mask_of(&self, ty: SymbolType) -> u64 {
        self.symbols
            .iter()
            .filter(|s| s.symbol_type == ty)
            .fold(0u64, |acc, s| acc | (1u64 << s.id))
    }

    /// Smallest run length (1-indexed count) that yields a non-zero payout,
    /// or `None` if the symbol never pays.
    pub fn min_pay_count(&self, id: SymbolId) -> Option<u32> {
        let def = self.get(id)?;
        def.pay_table
            .iter()
            .position(|&p| p != 0)
            .map(|idx| idx as u32 + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SymbolTable {
        SymbolTable {
            symbols: vec![
                SymbolDef {
                    id: 0,
                    symbol_type: SymbolType::Wild,
                    pay_table: vec![0, 0, 0, 5, 10],
                },
                SymbolDef {
                    id: 1,
                    symbol_type: SymbolType::High,
                    pay_table: vec![0, 0, 0, 9, 20],
                },
                SymbolDef {
                    id: 2,
                    symbol_type: SymbolType::Scatter,
                    pay_table: vec![0, 0, 2, 5, 10],
                },
            ],
        }
    }

    #[test]
    fn masks_are_disjoint_per_type() {
        let t = table();
        assert_eq!(t.wild_mask(), 0b001);
        assert_eq!(t.scatter_mask(), 0b100);
    }

    #[test]
    fn payable_mask_includes_every_paying_symbol() {
        let t = table();
        assert_eq!(t.payable_mask(), 0b111);
    }

    #[test]
    fn min_pay_count_is_first_nonzero_index_plus_one() {
        let t = table();
        assert_eq!(t.min_pay_count(0), Some(4));
        assert_eq!(t.min_pay_count(2), Some(3));
        assert_eq!(t.min_pay_count(99), None);
    }

    #[test]
    fn validate_rejects_mismatched_row_lengths() {
        let mut t = table();
        t.symbols[0].pay_table.push(99);
        assert!(t.validate().is_err());
    }

    #[test]
    fn validate_rejects_out_of_order_ids() {
        let mut t = table();
        t.symbols.swap(0, 1);
        assert!(t.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let mut t = table();
        t.symbols[2].id = 1;
        assert!(t.validate().is_err());
    }

    #[test]
    fn validate_rejects_table_over_cap() {
        let symbols = (0..MAX_SYMBOLS + 1)
            .map(|i| SymbolDef {
                id: i as SymbolId,
                symbol_type: SymbolType::None,
                pay_table: vec![0],
            })
            .collect();
        let t = SymbolTable { symbols };
        assert!(t.validate().is_err());
    }
}
