use crate::tables::FlatPayTable;
use problab_config::SymbolTable;
use problab_core::{CellIndex, SymbolId};
use problab_result::{Direction, GameModeResult};
use problab_screen::Board;

/// Evaluates "collect" bets: every payable symbol's occurrences anywhere
/// on the board (wilds substituting for all of them) pay once, keyed
/// purely by total count rather than position.
pub struct CountCalculator {
    pay: FlatPayTable,
    wild_mask: u64,
    payable_mask: u64,
    num_symbols: usize,
    columns: usize,
    rows: usize,

    count: Vec<u32>,
    hits_by_symbol: Vec<Vec<CellIndex>>,
    wild_count: u32,
    wild_hits: Vec<CellIndex>,
}

impl CountCalculator {
    pub fn build(symbols: &SymbolTable, columns: usize, rows: usize) -> Self {
        let num_symbols = symbols.symbols.len();
        Self {
            pay: FlatPayTable::build(symbols),
            wild_mask: symbols.wild_mask(),
            payable_mask: symbols.payable_mask(),
            num_symbols,
            columns,
            rows,
            count: vec![0; num_symbols],
            hits_by_symbol: vec![Vec::new(); num_symbols],
            wild_count: 0,
            wild_hits: Vec::new(),
        }
    }

    pub fn evaluate(&mut self, board: &Board, result: &mut GameModeResult) {
        self.count.iter_mut().for_each(|c| *c = 0);
        self.hits_by_symbol.iter_mut().for_each(Vec::clear);
        self.wild_count = 0;
        self.wild_hits.clear();

        for c in 0..self.columns {
            for r in 0..self.rows {
                let symbol = board.get(c, r);
                let cell = board.index(c, r) as CellIndex;
                if self.is_wild(symbol) {
                    self.wild_count += 1;
                    self.wild_hits.push(cell);
                } else {
                    self.count[symbol as usize] += 1;
                    self.hits_by_symbol[symbol as usize].push(cell);
                }
            }
        }

        for s in 0..self.num_symbols {
            let symbol = s as SymbolId;
            if self.payable_mask & (1u64 << symbol) == 0 {
                continue;
            }
            let (total, hits): (u32, Vec<CellIndex>) = if self.wild_mask & (1u64 << symbol) != 0 {
                if self.wild_count == 0 {
                    continue;
                }
                (self.wild_count, self.wild_hits.clone())
            } else {
                let total = self.count[s] + self.wild_count;
                if total == 0 {
                    continue;
                }
                let mut hits = self.hits_by_symbol[s].clone();
                hits.extend_from_slice(&self.wild_hits);
                (total, hits)
            };
            let win = self.pay.pay(symbol, total);
            if win == 0 {
                continue;
            }
            result.record_detail(win, symbol, None, total, 1, Direction::None, &hits);
        }
    }

    #[inline]
    fn is_wild(&self, symbol: SymbolId) -> bool {
        self.wild_mask & (1u64 << symbol) != 0
    }
}
