use crate::tables::{FlatLineTable, FlatPayTable};
use problab_config::{BetTypeFamily, LineTable, SymbolTable};
use problab_core::CellIndex;
use problab_result::{Direction, GameModeResult};
use problab_screen::Board;

/// One run candidate found while scanning a line: a symbol, a length, and
/// the physical `(column, row)` cells it occupies, in scan order.
struct Run {
    symbol: problab_core::SymbolId,
    len: u32,
    cells: Vec<(usize, usize)>,
}

/// Evaluates every line in both configured directions: a wild-prefix run
/// and a normal run are found for each traversal, the higher-paying one
/// wins (ties go to the normal run).
pub struct LineCalculator {
    pay: FlatPayTable,
    lines: FlatLineTable,
    wild_mask: u64,
    payable_mask: u64,
    do_ltr: bool,
    do_rtl: bool,
}

impl LineCalculator {
    pub fn build(bet_type: BetTypeFamily, symbols: &SymbolTable, table: &LineTable, columns: usize) -> Self {
        Self {
            pay: FlatPayTable::build(symbols),
            lines: FlatLineTable::build(table, columns),
            wild_mask: symbols.wild_mask(),
            payable_mask: symbols.payable_mask(),
            do_ltr: matches!(bet_type, BetTypeFamily::LineLtr | BetTypeFamily::LineBoth),
            do_rtl: matches!(bet_type, BetTypeFamily::LineRtl | BetTypeFamily::LineBoth),
        }
    }

    pub fn evaluate(&self, board: &Board, result: &mut GameModeResult) {
        for line_id in 0..self.lines.line_count() {
            if self.do_ltr {
                self.evaluate_direction(board, result, line_id, Direction::Ltr);
            }
            if self.do_rtl {
                self.evaluate_direction(board, result, line_id, Direction::Rtl);
            }
        }
    }

    fn evaluate_direction(
        &self,
        board: &Board,
        result: &mut GameModeResult,
        line_id: usize,
        direction: Direction,
    ) {
        let columns = board.columns();
        let rows = match direction {
            Direction::Ltr => self.lines.line(line_id),
            Direction::Rtl => self.lines.line_reversed(line_id),
            Direction::None => unreachable!("line evaluation always has a direction"),
        };
        let cell_at = |i: usize| -> (usize, usize) {
            match direction {
                Direction::Ltr => (i, rows[i]),
                Direction::Rtl => (columns - 1 - i, rows[i]),
                Direction::None => unreachable!(),
            }
        };
        let symbol_at = |i: usize| -> problab_core::SymbolId {
            let (c, r) = cell_at(i);
            board.get(c, r)
        };

        let mut prefix_len = 0usize;
        while prefix_len < columns && self.is_wild(symbol_at(prefix_len)) {
            prefix_len += 1;
        }

        let wild_run = if prefix_len > 0 && self.is_payable(symbol_at(0)) {
            let symbol = symbol_at(0);
            Some(Run {
                symbol,
                len: prefix_len as u32,
                cells: (0..prefix_len).map(cell_at).collect(),
            })
        } else {
            None
        };

        let normal_run = if prefix_len < columns {
            let symbol = symbol_at(prefix_len);
            if self.is_payable(symbol) {
                let mut len = prefix_len + 1;
                while len < columns {
                    let next = symbol_at(len);
                    if self.is_wild(next) || next == symbol {
                        len += 1;
                    } else {
                        break;
                    }
                }
                Some(Run {
                    symbol,
                    len: len as u32,
                    cells: (0..len).map(cell_at).collect(),
                })
            } else {
                None
            }
        } else {
            None
        };

        let wild_pay = wild_run.as_ref().map(|r| self.pay.pay(r.symbol, r.len)).unwrap_or(0);
        let normal_pay = normal_run.as_ref().map(|r| self.pay.pay(r.symbol, r.len)).unwrap_or(0);

        let chosen = if normal_pay >= wild_pay { normal_run } else { wild_run };
        let Some(run) = chosen else { return };
        let win = self.pay.pay(run.symbol, run.len);
        if win == 0 {
            return;
        }

        let hits: Vec<CellIndex> = run
            .cells
            .iter()
            .map(|&(c, r)| board.index(c, r) as CellIndex)
            .collect();
        result.record_detail(
            win,
            run.symbol,
            Some(line_id as u32),
            run.len,
            1,
            direction,
            &hits,
        );
    }

    #[inline]
    fn is_wild(&self, symbol: problab_core::SymbolId) -> bool {
        self.wild_mask & (1u64 << symbol) != 0
    }

    #[inline]
    fn is_payable(&self, symbol: problab_core::SymbolId) -> bool {
        self.payable_mask & (1u64 << symbol) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use problab_config::{SymbolDef, SymbolType};
    use problab_screen::Board;

    fn symbols() -> SymbolTable {
        SymbolTable {
            symbols: vec![
                SymbolDef {
                    id: 0,
                    symbol_type: SymbolType::Wild,
                    pay_table: vec![0, 0, 8, 20],
                },
                SymbolDef {
                    id: 1,
                    symbol_type: SymbolType::High,
                    pay_table: vec![0, 0, 5, 10],
                },
                SymbolDef {
                    id: 2,
                    symbol_type: SymbolType::Low,
                    pay_table: vec![0, 0, 0, 0],
                },
            ],
        }
    }

    fn board_from(cells: &[[u16; 1]], columns: usize, rows: usize) -> Board {
        let mut board = Board::new(columns, rows);
        for (c, col) in cells.iter().enumerate() {
            for (r, &s) in col.iter().enumerate() {
                board.set(c, r, s);
            }
        }
        board
    }

    #[test]
    fn normal_run_wins_on_pay_tie_with_wild_run() {
        let tied_symbols = SymbolTable {
            symbols: vec![
                SymbolDef {
                    id: 0,
                    symbol_type: SymbolType::Wild,
                    pay_table: vec![0, 7, 8, 20],
                },
                SymbolDef {
                    id: 1,
                    symbol_type: SymbolType::High,
                    pay_table: vec![0, 0, 0, 7],
                },
            ],
        };
        let table = LineTable {
            lines: vec![vec![0, 0, 0, 0]],
        };
        let calc = LineCalculator::build(BetTypeFamily::LineLtr, &tied_symbols, &table, 4);
        // wild, wild, 1, 1 -> wild-only run pays 7 (len 2), normal run pays 7 (len 4): a tie.
        let mut board = Board::new(4, 1);
        board.set(0, 0, 0);
        board.set(1, 0, 0);
        board.set(2, 0, 1);
        board.set(3, 0, 1);
        let mut result = GameModeResult::new(0, 4, 4, 8);
        calc.evaluate(&board, &mut result);
        assert_eq!(result.details().len(), 1);
        assert_eq!(result.details()[0].symbol, 1, "normal run must win the tie");
        assert_eq!(result.details()[0].count, 4);
    }

    #[test]
    fn no_detail_emitted_when_no_run_pays() {
        let table = LineTable {
            lines: vec![vec![0, 0]],
        };
        let calc = LineCalculator::build(BetTypeFamily::LineLtr, &symbols(), &table, 2);
        let board = board_from(&[[2], [2]], 2, 1);
        let mut result = GameModeResult::new(0, 2, 4, 8);
        calc.evaluate(&board, &mut result);
        assert!(result.details().is_empty());
    }

    #[test]
    fn rtl_direction_traverses_from_last_column() {
        let table = LineTable {
            lines: vec![vec![0, 0, 0]],
        };
        let calc = LineCalculator::build(BetTypeFamily::LineRtl, &symbols(), &table, 3);
        let mut board = Board::new(3, 1);
        board.set(0, 0, 2);
        board.set(1, 0, 1);
        board.set(2, 0, 1);
        let mut result = GameModeResult::new(0, 3, 4, 8);
        calc.evaluate(&board, &mut result);
        assert_eq!(result.details().len(), 1);
        assert_eq!(result.details()[0].count, 2);
        assert_eq!(result.details()[0].direction, Direction::Rtl);
    }
}
