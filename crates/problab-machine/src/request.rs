use problab_core::{Credits, Seq};
use problab_result::GameModeResult;

/// Caller-provided PRNG restore point, carried across a request boundary so
/// a previously served spin can be reproduced bit-for-bit.
///
/// `checkpoint` is an opaque per-game payload the engine round-trips
/// without interpreting; only `GameLogic` implementations understand its
/// shape.
#[derive(Debug, Clone)]
pub struct StartState {
    pub start_snap_bytes: Vec<u8>,
    pub checkpoint: serde_json::Value,
}

/// One spin request. `choice` is `None` unless the caller explicitly set
/// `has_choice`; the wire boundary (`problab-transport`) is responsible for
/// rejecting `has_choice = false` with a non-null `choice` — by the time a
/// request reaches `Machine`, that invariant already holds.
#[derive(Debug, Clone)]
pub struct SpinRequest {
    pub uid: String,
    pub game_name: String,
    pub game_id: u32,
    pub bet: Credits,
    pub bet_mode: usize,
    pub bet_mult: Credits,
    pub cycle: u32,
    pub choice: Option<i64>,
    pub start_state: Option<StartState>,
}

/// One mode's yielded result, tagged by which mode produced it. `Machine`
/// clones these out of the mode's result pool while holding its lock, so
/// callers can serialize them without reaching back into machine state.
#[derive(Debug, Clone)]
pub struct ModeOutcome {
    pub mode_id: Seq,
    pub result: GameModeResult,
}

/// Everything a `Machine::spin` call produces: the echoed request
/// identity/bet fields, the yielded mode results in order, and the PRNG
/// snapshot pair the caller needs to reproduce this exact spin later.
#[derive(Debug, Clone)]
pub struct SpinOutcome {
    pub uid: String,
    pub game_name: String,
    pub game_id: u32,
    pub bet: Credits,
    pub bet_mode: usize,
    pub bet_mult: Credits,
    pub total_win: Credits,
    pub is_game_end: bool,
    pub checkpoint: serde_json::Value,
    pub modes: Vec<ModeOutcome>,
    pub start_snap: Vec<u8>,
    pub after_snap: Vec<u8>,
}
