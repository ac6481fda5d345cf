use problab_core::{Combinations, Count, Credits, SymbolId};
use serde::{Deserialize, Serialize};

/// Which way a Line evaluator traversed when it produced this win. `None`
/// applies to bet families that have no direction (Count, Cluster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Ltr,
    Rtl,
    None,
}

/// One contribution to a spin's win. `hits_start`/`hits_length` index into
/// the owning [`crate::GameModeResult`]'s `hits` arena rather than owning
/// their own storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    pub win: Credits,
    pub symbol: SymbolId,
    /// Line identifier, for Line-family bet types; `None` otherwise.
    pub line_id: Option<u32>,
    pub count: Count,
    pub combinations: Combinations,
    pub direction: Direction,
    pub hits_start: u32,
    pub hits_length: u32,
}
