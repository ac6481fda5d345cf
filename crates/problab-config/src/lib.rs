//! Data-only game configuration: symbols, reels, line tables, and the
//! [`GameConfig`] tree that ties a whole game together.
//!
//! Nothing here reads from disk or touches I/O; parsing a config file into
//! these types (YAML, JSON, whatever a deployment standardizes on) is a
//! caller concern. Everything is `serde`-derived so any format with a serde
//! backend works without changes on this side.
//!
//! Bet-type-specific flattening (flattened pay tables, reversed line
//! tables, per-symbol offsets) is deliberately *not* done here — that is
//! calculator-init-time work owned by `problab-calc`, which treats these
//! types as its read-only source of truth.

mod line;
mod mode;
mod reel;
mod screen;
mod symbol;

pub use line::LineTable;
pub use mode::{BetTypeFamily, GameConfig, HitSettings, ModeSetting};
pub use reel::{ReelSet, ReelStrip, WeightedReelSet};
pub use screen::{GenScreenSettings, GenStrategy, ScreenSettings};
pub use symbol::{SymbolDef, SymbolTable, SymbolType};
