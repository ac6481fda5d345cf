//! Board generation.
//!
//! [`ScreenGenerator`] selects a reel-set (weighted among a mode's
//! alternatives) and fills a [`Board`] from it, per the strategy configured
//! in `problab-config`. All sampling tables are built once at construction;
//! generation itself never allocates.

mod board;
mod generator;

pub use board::Board;
pub use generator::ScreenGenerator;
