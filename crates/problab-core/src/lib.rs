//! Core type aliases, error taxonomy, and constants for problab.
//!
//! This crate provides the foundational types shared across the problab
//! workspace: the credit/count type aliases used by every downstream crate,
//! the leveled error type that every fallible core operation returns, and a
//! handful of global capacity constants.
#![allow(dead_code)]

mod error;

pub use error::ErrorLevel;
pub use error::ProblabError;
pub use error::SnapshotPhase;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Index into a mode's symbol table; fits in 16 bits per the data model.
pub type SymbolId = u16;
/// Index of a board column.
pub type Column = usize;
/// Index of a board row.
pub type Row = usize;
/// Flat row-major index into a `columns x rows` board.
pub type CellIndex = u16;
/// Credit amount relative to one bet unit (the engine never handles money).
pub type Credits = i64;
/// Run-length / occurrence count used to index a pay table.
pub type Count = u32;
/// Combinatorial multiplier for Way bets (product of per-column occurrence counts).
pub type Combinations = u64;
/// Unsigned identifier for a game, round, step, or act within a spin.
pub type Seq = u32;
/// Caller-defined tag for an Act's event kind (e.g. "spin", "respin",
/// "bonus-pick"); opaque to the core, interpreted only by `GameLogic`.
pub type ActTag = u32;

// ============================================================================
// CAPACITY CONSTANTS
// ============================================================================
/// Default number of `GameModeResult` buffers a `GameMode`'s pool starts with.
pub const RESULT_POOL_SIZE: usize = 3;
/// Above this total weight, samplers prefer an [`AliasTable`]-style O(1) pick
/// over materializing a lookup table.
///
/// [`AliasTable`]: https://docs.rs/problab-sampler
pub const LUT_WEIGHT_CAP: u64 = 100_000;
/// Hard cap on a lookup table's materialized length, to bound memory.
pub const LUT_LENGTH_CAP: u64 = 10_000_000;
/// Default capacity of a `MachinePool`'s broken-machine channel.
pub const POOL_BROKEN_CHANNEL_CAP: usize = 100;
/// Symbol table cardinality ceiling; membership tests use a single u64 mask.
pub const MAX_SYMBOLS: usize = 64;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + timestamped file). Library crates
/// should never call this; it is reserved for binaries.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
