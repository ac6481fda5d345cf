//! Per-mode spin result accumulation.
//!
//! [`GameModeResult`] is the buffer a [`problab_calc`](../problab_calc/index.html)
//! evaluator writes into and a `GameLogic` commits: flat arenas for board
//! snapshots, win details, and hit cell indices, plus a sequence of
//! committed [`Act`]s. See the crate's `buffer` module for the
//! discard/commit atomicity contract.

mod act;
mod buffer;
mod detail;

pub use act::{Act, Finish};
pub use buffer::GameModeResult;
pub use detail::{Detail, Direction};
