use crate::board::Board;
use problab_config::{GenScreenSettings, GenStrategy};
use problab_core::ProblabError;
use problab_prng::Prng;
use problab_sampler::WeightedTable;

/// The sampling tables built once for one candidate reel-set: which
/// reel-set to pick (folded into the parent's selector) and, per column, a
/// table over that strip's positions weighted by the strip's weight vector.
struct ReelSetTables {
    strip_tables: Vec<WeightedTable>,
}

/// Produces a `columns x rows` [`Board`] by first selecting a reel-set
/// (weighted among the mode's configured alternatives) and then filling
/// each column from its strip per the configured [`GenStrategy`].
///
/// All sampling tables are built once at construction; `generate` performs
/// no allocation and is `O(columns * rows)`.
pub struct ScreenGenerator {
    columns: usize,
    rows: usize,
    strategy: GenStrategy,
    reel_set_select: WeightedTable,
    reel_sets: Vec<ReelSetTables>,
    strips: Vec<Vec<Vec<problab_core::SymbolId>>>,
    board: Board,
}

impl ScreenGenerator {
    pub fn build(settings: &GenScreenSettings) -> Result<Self, ProblabError> {
        settings
            .validate()
            .map_err(|reason| ProblabError::InvalidConfig { reason })?;

        let select_weights: Vec<i64> = settings.reel_sets.iter().map(|w| w.weight).collect();
        let reel_set_select = WeightedTable::build(&select_weights)?;

        let mut reel_sets = Vec::with_capacity(settings.reel_sets.len());
        let mut strips = Vec::with_capacity(settings.reel_sets.len());
        for wrs in &settings.reel_sets {
            let mut strip_tables = Vec::with_capacity(wrs.reel_set.strips.len());
            let mut strip_symbols = Vec::with_capacity(wrs.reel_set.strips.len());
            for strip in &wrs.reel_set.strips {
                strip_tables.push(WeightedTable::build(&strip.weights)?);
                strip_symbols.push(strip.symbols.clone());
            }
            reel_sets.push(ReelSetTables { strip_tables });
            strips.push(strip_symbols);
        }

        Ok(Self {
            columns: settings.screen.columns,
            rows: settings.screen.rows,
            strategy: settings.strategy,
            reel_set_select,
            reel_sets,
            strips,
            board: Board::new(settings.screen.columns, settings.screen.rows),
        })
    }

    /// Generates a new board into the owned buffer and returns a reference
    /// to it. The reference is valid until the next call to `generate`.
    pub fn generate(&mut self, prng: &mut impl Prng) -> &Board {
        let reel_set_idx = self.reel_set_select.pick(prng);
        let tables = &self.reel_sets[reel_set_idx];
        let symbols = &self.strips[reel_set_idx];

        for column in 0..self.columns {
            let strip_symbols = &symbols[column];
            let len = strip_symbols.len();
            match self.strategy {
                GenStrategy::ByReelIndex => {
                    let start = tables.strip_tables[column].pick(prng);
                    for row in 0..self.rows {
                        let symbol = strip_symbols[(start + row) % len];
                        self.board.set(column, row, symbol);
                    }
                }
                GenStrategy::BySymbolWeight => {
                    for row in 0..self.rows {
                        let pos = tables.strip_tables[column].pick(prng);
                        self.board.set(column, row, strip_symbols[pos]);
                    }
                }
            }
        }
        &self.board
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}
