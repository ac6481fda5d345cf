use problab_core::Row;
use serde::{Deserialize, Serialize};

/// The raw, unflattened line table: each entry is a line's row index per
/// column. `problab-calc` flattens this (row-major, with per-line start
/// offsets and a precomputed reversed copy) at calculator-init time; this
/// crate stores only the authored, human-editable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTable {
    pub lines: Vec<Vec<Row>>,
}

impl LineTable {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Every line must visit exactly `columns` cells and every row index
    /// must be in range.
    pub fn validate(&self, columns: usize, rows: usize) -> Result<(), String> {
        for (i, line) in self.lines.iter().enumerate() {
            if line.len() != columns {
                return Err(format!(
                    "line {i} has {} entries, expected {columns} columns",
                    line.len()
                ));
            }
            if line.iter().any(|&r| r >= rows) {
                return Err(format!("line {i} references a row outside 0..{rows}"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_wrong_column_count() {
        let table = LineTable {
            lines: vec![vec![0, 1]],
        };
        assert!(table.validate(3, 3).is_err());
    }

    #[test]
    fn validate_rejects_row_out_of_range() {
        let table = LineTable {
            lines: vec![vec![0, 5, 0]],
        };
        assert!(table.validate(3, 3).is_err());
    }

    #[test]
    fn validate_accepts_well_formed_table() {
        let table = LineTable {
            lines: vec![vec![0, 0, 0], vec![1, 1, 1], vec![0, 1, 2]],
        };
        assert!(table.validate(3, 3).is_ok());
    }
}
