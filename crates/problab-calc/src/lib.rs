//! Win calculators: one evaluator per [`BetTypeFamily`].
//!
//! Each calculator precomputes its scratch layout (flattened pay tables,
//! wild/payable bitmasks, direction flags) once at construction and reuses
//! it across spins; the only thing rebuilt per spin is the small amount of
//! per-board scratch (occurrence counts, visited flags) each evaluator
//! needs. Evaluators never close an Act themselves — they only call
//! [`problab_result::GameModeResult::record_detail`] /
//! `record_detail_segments`; committing is the calling `GameLogic`'s job.

mod cluster;
mod count;
mod line;
mod tables;
mod way;

pub use cluster::ClusterCalculator;
pub use count::CountCalculator;
pub use line::LineCalculator;
pub use way::WayCalculator;

use problab_config::{BetTypeFamily, HitSettings, SymbolTable};
use problab_core::ProblabError;
use problab_result::GameModeResult;
use problab_screen::Board;

/// A calculator for one mode's bet-type family. Built once at mode-init
/// time from the mode's [`HitSettings`]/[`SymbolTable`]; `evaluate` is
/// called once per spin with the generated board.
pub enum ScreenCalculator {
    Line(LineCalculator),
    Way(WayCalculator),
    Count(CountCalculator),
    Cluster(ClusterCalculator),
}

impl ScreenCalculator {
    pub fn build(hit: &HitSettings, symbols: &SymbolTable, columns: usize, rows: usize) -> Result<Self, ProblabError> {
        Ok(match hit.bet_type {
            BetTypeFamily::LineLtr | BetTypeFamily::LineRtl | BetTypeFamily::LineBoth => {
                let table = hit.line_table.as_ref().ok_or_else(|| ProblabError::InvalidConfig {
                    reason: "line bet type requires a line table".into(),
                })?;
                Self::Line(LineCalculator::build(hit.bet_type, symbols, table, columns))
            }
            BetTypeFamily::WayLtr | BetTypeFamily::WayRtl | BetTypeFamily::WayBoth => {
                Self::Way(WayCalculator::build(hit.bet_type, symbols, columns, rows))
            }
            BetTypeFamily::Count => Self::Count(CountCalculator::build(symbols, columns, rows)),
            BetTypeFamily::Cluster => Self::Cluster(ClusterCalculator::build(symbols, columns, rows)),
        })
    }

    pub fn evaluate(&mut self, board: &Board, result: &mut GameModeResult) {
        match self {
            Self::Line(c) => c.evaluate(board, result),
            Self::Way(c) => c.evaluate(board, result),
            Self::Count(c) => c.evaluate(board, result),
            Self::Cluster(c) => c.evaluate(board, result),
        }
    }
}
