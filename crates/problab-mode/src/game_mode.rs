use crate::capacity::estimate_capacity;
use problab_calc::ScreenCalculator;
use problab_config::ModeSetting;
use problab_core::{ProblabError, Seq, RESULT_POOL_SIZE};
use problab_prng::Prng;
use problab_result::GameModeResult;
use problab_screen::{Board, ScreenGenerator};

/// One configured game mode: a generator, a calculator, and a growable
/// pool of [`GameModeResult`] buffers a `GameLogic` yields through as a
/// spin progresses (e.g. base game, then a free-spin mode).
///
/// The pool is an arena: `yield_result` hands back the index of the just-
/// finished buffer rather than a live reference, so the caller can keep
/// mutating later slots in the same spin without fighting the borrow
/// checker. Call [`Self::result`] with that index once the spin is over.
pub struct GameMode {
    generator: ScreenGenerator,
    calculator: ScreenCalculator,
    mode_id: Seq,
    pool: Vec<GameModeResult>,
    pid: usize,
    screen_size: usize,
    est_details: usize,
    est_hits: usize,
}

impl GameMode {
    pub fn build(setting: &ModeSetting) -> Result<Self, ProblabError> {
        let columns = setting.gen_screen.screen.columns;
        let rows = setting.gen_screen.screen.rows;
        let line_count = setting
            .hit
            .line_table
            .as_ref()
            .map(|t| t.line_count())
            .unwrap_or(0);
        let (est_details, est_hits) = estimate_capacity(
            setting.hit.bet_type,
            setting.symbol.symbols.len(),
            line_count,
            columns,
            rows,
        );
        let screen_size = columns * rows;
        let pool = (0..RESULT_POOL_SIZE)
            .map(|_| GameModeResult::new(setting.mode_id, screen_size, est_details, est_hits))
            .collect();

        Ok(Self {
            generator: ScreenGenerator::build(&setting.gen_screen)?,
            calculator: ScreenCalculator::build(&setting.hit, &setting.symbol, columns, rows)?,
            mode_id: setting.mode_id,
            pool,
            pid: 0,
            screen_size,
            est_details,
            est_hits,
        })
    }

    pub fn mode_id(&self) -> Seq {
        self.mode_id
    }

    /// Generates a board into the generator's reused buffer.
    pub fn generate(&mut self, prng: &mut impl Prng) -> &Board {
        self.generator.generate(prng)
    }

    /// Runs the mode's calculator against `board`, recording details into
    /// the current result buffer.
    pub fn evaluate(&mut self, board: &Board) {
        self.calculator.evaluate(board, &mut self.pool[self.pid]);
    }

    pub fn current(&self) -> &GameModeResult {
        &self.pool[self.pid]
    }

    pub fn current_mut(&mut self) -> &mut GameModeResult {
        &mut self.pool[self.pid]
    }

    /// Looks up a buffer by the index `yield_result` returned earlier.
    pub fn result(&self, pid: usize) -> &GameModeResult {
        &self.pool[pid]
    }

    /// Marks the current buffer as mode-end and advances to a fresh one,
    /// growing the pool if it's exhausted. Returns the index of the
    /// just-finished buffer.
    pub fn yield_result(&mut self) -> usize {
        let finished = self.pid;
        self.pool[finished].is_mode_end = true;
        self.pid += 1;
        if self.pid >= self.pool.len() {
            let growth = self.pool.len().max(RESULT_POOL_SIZE);
            for _ in 0..growth {
                self.pool
                    .push(GameModeResult::new(self.mode_id, self.screen_size, self.est_details, self.est_hits));
            }
        }
        self.pool[self.pid].reset();
        finished
    }

    /// Resets the pool cursor to the start of a fresh spin.
    pub fn reset_game_mode_result(&mut self) {
        self.pid = 0;
        self.pool[0].reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use problab_config::{
        BetTypeFamily, GenScreenSettings, GenStrategy, HitSettings, LineTable, ReelSet, ReelStrip, ScreenSettings,
        SymbolDef, SymbolTable, SymbolType, WeightedReelSet,
    };

    fn setting() -> ModeSetting {
        ModeSetting {
            mode_name: "base".into(),
            mode_id: 0,
            gen_screen: GenScreenSettings {
                screen: ScreenSettings { columns: 3, rows: 1 },
                strategy: GenStrategy::ByReelIndex,
                reel_sets: vec![WeightedReelSet {
                    reel_set: ReelSet {
                        strips: vec![
                            ReelStrip {
                                symbols: vec![0, 1],
                                weights: vec![1, 1],
                            };
                            3
                        ],
                    },
                    weight: 1,
                }],
            },
            symbol: SymbolTable {
                symbols: vec![
                    SymbolDef {
                        id: 0,
                        symbol_type: SymbolType::Wild,
                        pay_table: vec![0, 0, 10],
                    },
                    SymbolDef {
                        id: 1,
                        symbol_type: SymbolType::High,
                        pay_table: vec![0, 0, 5],
                    },
                ],
            },
            hit: HitSettings {
                bet_type: BetTypeFamily::LineBoth,
                line_table: Some(LineTable {
                    lines: vec![vec![0, 0, 0]],
                }),
            },
            fixed: serde_json::Value::Null,
        }
    }

    #[test]
    fn yield_result_advances_pid_and_resets_new_current() {
        let mut mode = GameMode::build(&setting()).unwrap();
        let mut prng = problab_prng::Pcg64::seed_from_i64(1);
        let board = mode.generate(&mut prng).clone();
        mode.evaluate(&board);
        let finished_pid = mode.yield_result();
        assert_eq!(finished_pid, 0);
        assert!(mode.result(finished_pid).is_mode_end);
        assert_eq!(mode.current().total_win, 0);
    }

    #[test]
    fn pool_grows_past_initial_size() {
        let mut mode = GameMode::build(&setting()).unwrap();
        for _ in 0..(RESULT_POOL_SIZE + 2) {
            mode.yield_result();
        }
        assert!(mode.pool.len() > RESULT_POOL_SIZE);
    }

    #[test]
    fn reset_returns_cursor_to_zero() {
        let mut mode = GameMode::build(&setting()).unwrap();
        mode.yield_result();
        mode.yield_result();
        mode.reset_game_mode_result();
        assert_eq!(mode.pid, 0);
        assert_eq!(mode.current().total_win, 0);
    }
}
