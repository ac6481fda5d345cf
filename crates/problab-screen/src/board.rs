use problab_core::SymbolId;

/// A dense row-major `columns x rows` array of symbols, owned and reused by
/// a [`crate::ScreenGenerator`] across spins. Callers must not retain a
/// reference past the next call to [`crate::ScreenGenerator::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<SymbolId>,
    columns: usize,
    rows: usize,
}

impl Board {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            cells: vec![0; columns * rows],
            columns,
            rows,
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major flat index for `(column, row)`.
    #[inline]
    pub fn index(&self, column: usize, row: usize) -> usize {
        column * self.rows + row
    }

    #[inline]
    pub fn get(&self, column: usize, row: usize) -> SymbolId {
        self.cells[self.index(column, row)]
    }

    #[inline]
    pub fn set(&mut self, column: usize, row: usize, symbol: SymbolId) {
        let idx = self.index(column, row);
        self.cells[idx] = symbol;
    }

    pub fn as_slice(&self) -> &[SymbolId] {
        &self.cells
    }

    pub fn as_mut_slice(&mut self) -> &mut [SymbolId] {
        &mut self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_column_major_over_rows() {
        let board = Board::new(3, 2);
        assert_eq!(board.index(0, 0), 0);
        assert_eq!(board.index(0, 1), 1);
        assert_eq!(board.index(1, 0), 2);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut board = Board::new(2, 2);
        board.set(1, 1, 7);
        assert_eq!(board.get(1, 1), 7);
        assert_eq!(board.get(0, 0), 0);
    }
}
