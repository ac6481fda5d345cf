use crate::tables::FlatPayTable;
use problab_config::{BetTypeFamily, SymbolTable};
use problab_core::{CellIndex, Combinations, SymbolId};
use problab_result::{Direction, GameModeResult};
use problab_screen::Board;

/// Evaluates "ways to win" bets: a payable starting symbol in the first
/// column extends across consecutive columns where it
/// (or a wild) appears, and pays the product of per-column occurrence
/// counts. Scratch buffers are rebuilt from the board each `evaluate` call
/// but never reallocated once sized to `symbols * columns`.
pub struct WayCalculator {
    pay: FlatPayTable,
    wild_mask: u64,
    payable_mask: u64,
    do_ltr: bool,
    do_rtl: bool,
    num_symbols: usize,
    columns: usize,
    rows: usize,

    count: Vec<u32>,
    hits_by_symbol_column: Vec<Vec<CellIndex>>,
    wild_per_column: Vec<u32>,
    wild_hits: Vec<Vec<CellIndex>>,
}

impl WayCalculator {
    pub fn build(bet_type: BetTypeFamily, symbols: &SymbolTable, columns: usize, rows: usize) -> Self {
        let num_symbols = symbols.symbols.len();
        Self {
            pay: FlatPayTable::build(symbols),
            wild_mask: symbols.wild_mask(),
            payable_mask: symbols.payable_mask(),
            do_ltr: matches!(bet_type, BetTypeFamily::WayLtr | BetTypeFamily::WayBoth),
            do_rtl: matches!(bet_type, BetTypeFamily::WayRtl | BetTypeFamily::WayBoth),
            num_symbols,
            columns,
            rows,
            count: vec![0; num_symbols * columns],
            hits_by_symbol_column: vec![Vec::new(); num_symbols * columns],
            wild_per_column: vec![0; columns],
            wild_hits: vec![Vec::new(); columns],
        }
    }

    pub fn evaluate(&mut self, board: &Board, result: &mut GameModeResult) {
        self.rebuild_scratch(board);
        if self.do_ltr {
            self.evaluate_direction(board, result, Direction::Ltr);
        }
        if self.do_rtl {
            self.evaluate_direction(board, result, Direction::Rtl);
        }
    }

    fn rebuild_scratch(&mut self, board: &Board) {
        self.count.iter_mut().for_each(|c| *c = 0);
        self.wild_per_column.iter_mut().for_each(|c| *c = 0);
        self.hits_by_symbol_column.iter_mut().for_each(Vec::clear);
        self.wild_hits.iter_mut().for_each(Vec::clear);

        for c in 0..self.columns {
            for r in 0..self.rows {
                let symbol = board.get(c, r);
                let cell = board.index(c, r) as CellIndex;
                if self.is_wild(symbol) {
                    self.wild_per_column[c] += 1;
                    self.wild_hits[c].push(cell);
                } else {
                    let idx = symbol as usize * self.columns + c;
                    self.count[idx] += 1;
                    self.hits_by_symbol_column[idx].push(cell);
                }
            }
        }
    }

    fn evaluate_direction(&self, board: &Board, result: &mut GameModeResult, direction: Direction) {
        let col_at = |i: usize| -> usize {
            match direction {
                Direction::Ltr => i,
                Direction::Rtl => self.columns - 1 - i,
                Direction::None => unreachable!(),
            }
        };

        let mut seen: u64 = 0;
        for r in 0..self.rows {
            let first_col = col_at(0);
            let s = board.get(first_col, r);
            let bit = 1u64 << s;
            if seen & bit != 0 {
                continue;
            }
            seen |= bit;
            if !self.is_payable(s) {
                continue;
            }

            let (len, comb, seg1, seg2) = if self.is_wild(s) {
                self.wild_started(&col_at)
            } else {
                self.normal_started(s, &col_at)
            };

            let win = self.pay.pay(s, len);
            if win == 0 {
                continue;
            }
            result.record_detail_segments(win, s, None, len, comb as Combinations, direction, &seg1, &seg2);
        }
    }

    fn wild_started(&self, col_at: &impl Fn(usize) -> usize) -> (u32, u64, Vec<CellIndex>, Vec<CellIndex>) {
        let mut len = 1u32;
        let mut comb = self.wild_per_column[col_at(0)] as u64;
        let mut i = 1;
        while i < self.columns {
            let c = col_at(i);
            if self.wild_per_column[c] == 0 {
                break;
            }
            comb *= self.wild_per_column[c] as u64;
            len += 1;
            i += 1;
        }
        let mut hits = Vec::new();
        for step in 0..len as usize {
            hits.extend_from_slice(&self.wild_hits[col_at(step)]);
        }
        (len, comb, hits, Vec::new())
    }

    fn normal_started(
        &self,
        s: SymbolId,
        col_at: &impl Fn(usize) -> usize,
    ) -> (u32, u64, Vec<CellIndex>, Vec<CellIndex>) {
        let idx = |c: usize| s as usize * self.columns + c;
        let mut len = 1u32;
        let c0 = col_at(0);
        let mut comb = self.count[idx(c0)] as u64;
        let mut i = 1;
        while i < self.columns {
            let c = col_at(i);
            let total = self.count[idx(c)] + self.wild_per_column[c];
            if total == 0 {
                break;
            }
            comb *= total as u64;
            len += 1;
            i += 1;
        }
        let mut self_hits = Vec::new();
        for step in 0..len as usize {
            self_hits.extend_from_slice(&self.hits_by_symbol_column[idx(col_at(step))]);
        }
        let mut wild_hits = Vec::new();
        for step in 1..len as usize {
            wild_hits.extend_from_slice(&self.wild_hits[col_at(step)]);
        }
        (len, comb, self_hits, wild_hits)
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
