use crate::tables::FlatPayTable;
use problab_config::SymbolTable;
use problab_core::{CellIndex, SymbolId};
use problab_result::{Direction, GameModeResult};
use problab_screen::Board;

/// Evaluates cluster-pays bets: 4-neighborhood BFS connected components of
/// a payable symbol, with wild cells joining whichever cluster reaches
/// them first. A cluster whose size meets the symbol's `min_pay_count`
/// pays at the size-1 band, clamped to the pay table's last band for
/// oversized clusters.
pub struct ClusterCalculator {
    pay: FlatPayTable,
    wild_mask: u64,
    payable_mask: u64,
    columns: usize,
    rows: usize,

    visited: Vec<bool>,
    wild_epoch: Vec<u32>,
    epoch: u32,
    queue: Vec<usize>,
}

impl ClusterCalculator {
    pub fn build(symbols: &SymbolTable, columns: usize, rows: usize) -> Self {
        let cells = columns * rows;
        Self {
            pay: FlatPayTable::build(symbols),
            wild_mask: symbols.wild_mask(),
            payable_mask: symbols.payable_mask(),
            columns,
            rows,
            visited: vec![false; cells],
            wild_epoch: vec![0; cells],
            epoch: 0,
            queue: Vec::with_capacity(cells),
        }
    }

    pub fn evaluate(&mut self, board: &Board, result: &mut GameModeResult) {
        self.visited.iter_mut().for_each(|v| *v = false);
        self.wild_epoch.iter_mut().for_each(|e| *e = 0);
        self.epoch = 0;

        for c in 0..self.columns {
            for r in 0..self.rows {
                let start = self.cell_index(c, r);
                if self.visited[start] {
                    continue;
                }
                let symbol = board.get(c, r);
                if self.is_wild(symbol) || !self.is_payable(symbol) {
                    continue;
                }
                let members = self.flood_fill(board, c, r, symbol);
                let min_count = self.pay.min_pay_count(symbol);
                if min_count == 0 || (members.len() as u32) < min_count {
                    continue;
                }
                let win = self.pay.pay_clamped(symbol, members.len() as u32);
                if win == 0 {
                    continue;
                }
                result.record_detail(
                    win,
                    symbol,
                    None,
                    members.len() as u32,
                    1,
                    Direction::None,
                    &members,
                );
            }
        }
    }

    fn flood_fill(&mut self, board: &Board, start_col: usize, start_row: usize, symbol: SymbolId) -> Vec<CellIndex> {
        self.epoch += 1;
        let epoch = self.epoch;
        self.queue.clear();
        let start = self.cell_index(start_col, start_row);
        self.visited[start] = true;
        self.queue.push(start);
        let mut members = vec![board.index(start_col, start_row) as CellIndex];

        let mut head = 0;
        while head < self.queue.len() {
            let current = self.queue[head];
            head += 1;
            let (col, row) = self.coords(current);
            for (nc, nr) in self.neighbors(col, row) {
                let n = self.cell_index(nc, nr);
                let n_symbol = board.get(nc, nr);
                if n_symbol == symbol && !self.visited[n] {
                    self.visited[n] = true;
                    self.queue.push(n);
                    members.push(board.index(nc, nr) as CellIndex);
                } else if self.is_wild(n_symbol) && self.wild_epoch[n] != epoch {
                    self.wild_epoch[n] = epoch;
                    self.queue.push(n);
                    members.push(board.index(nc, nr) as CellIndex);
                }
            }
        }
        members
    }

    fn neighbors(&self, col: usize, row: usize) -> impl Iterator<Item = (usize, usize)> {
        let columns = self.columns;
        let rows = self.rows;
        [
            (col.checked_sub(1), Some(row)),
            (Some(col + 1).filter(|&c| c < columns), Some(row)),
            (Some(col), row.checked_sub(1)),
            (Some(col), Some(row + 1).filter(|&r| r < rows)),
        ]
        .into_iter()
        .filter_map(|(c, r)| match (c, r) {
            (Some(c), Some(r)) => Some((c, r)),
            _ => None,
        })
    }

    #[inline]
    fn cell_index(&self, column: usize, row: usize) -> usize {
        column * self.rows + row
    }

    #[inline]
    fn coords(&self, cell: usize) -> (usize, usize) {
        (cell / self.rows, cell % self.rows)
    }

    #[inline]
    fn is_wild(&self, symbol: SymbolId) -> bool {
        self.wild_mask & (1u64 << symbol) != 0
    }

    #[inline]
    fn is_payable(&self, symbol: SymbolId) -> bool {
        self.payable_mask & (1u64 << symbol) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use problab_config::{SymbolDef, SymbolType};

    fn symbols() -> SymbolTable {
        SymbolTable {
            symbols: vec![
                SymbolDef {
                    id: 0,
                    symbol_type: SymbolType::Wild,
                    pay_table: vec![0, 0, 0, 0],
                },
                SymbolDef {
                    id: 1,
                    symbol_type: SymbolType::High,
                    pay_table: vec![0, 0, 5, 10],
                },
            ],
        }
    }

    #[test]
    fn connected_cluster_of_min_size_pays() {
        let mut calc = ClusterCalculator::build(&symbols(), 3, 1);
        let mut board = Board::new(3, 1);
        board.set(0, 0, 1);
        board.set(1, 0, 1);
        board.set(2, 0, 1);
        let mut result = GameModeResult::new(0, 3, 4, 16);
        calc.evaluate(&board, &mut result);
        assert_eq!(result.details().len(), 1);
        assert_eq!(result.details()[0].count, 3);
        assert_eq!(result.details()[0].win, 5);
    }

    #[test]
    fn cluster_below_min_pay_count_emits_nothing() {
        let symbols_with_filler = SymbolTable {
            symbols: vec![
                symbols().symbols[0].clone(),
                symbols().symbols[1].clone(),
                SymbolDef {
                    id: 2,
                    symbol_type: SymbolType::None,
                    pay_table: vec![0, 0, 0, 0],
                },
            ],
        };
        let mut calc = ClusterCalculator::build(&symbols_with_filler, 3, 1);
        let mut board = Board::new(3, 1);
        board.set(0, 0, 1);
        board.set(1, 0, 2); // non-payable, non-wild: blocks connectivity
        board.set(2, 0, 1);
        let mut result = GameModeResult::new(0, 3, 4, 16);
        calc.evaluate(&board, &mut result);
        assert!(result.details().is_empty());
    }

    #[test]
    fn wild_cells_join_adjacent_cluster() {
        let mut calc = ClusterCalculator::build(&symbols(), 3, 1);
        let mut board = Board::new(3, 1);
        board.set(0, 0, 1);
        board.set(1, 0, 0); // wild bridges
        board.set(2, 0, 1);
        let mut result = GameModeResult::new(0, 3, 4, 16);
        calc.evaluate(&board, &mut result);
        assert_eq!(result.details().len(), 1);
        assert_eq!(result.details()[0].count, 3);
    }

    #[test]
    fn oversized_cluster_clamps_to_max_pay_band() {
        // pay table has width 4 (len1..len4); a cluster of 6 must clamp to the len4 band.
        let mut calc = ClusterCalculator::build(&symbols(), 3, 2);
        let mut board = Board::new(3, 2);
        for c in 0..3 {
            for r in 0..2 {
                board.set(c, r, 1);
            }
        }
        let mut result = GameModeResult::new(0, 6, 4, 16);
        calc.evaluate(&board, &mut result);
        assert_eq!(result.details().len(), 1);
        assert_eq!(result.details()[0].count, 6);
        assert_eq!(result.details()[0].win, 10, "size 6 clamps to the highest defined (len4) band");
    }
}
