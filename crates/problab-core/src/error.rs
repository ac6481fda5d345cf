use thiserror::Error;

/// Severity of a [`ProblabError`], threaded through the call chain so the
/// transport boundary can map it to a status code without inspecting the
/// error's message.
///
/// - `Fatal` -> HTTP 500; triggers pool-level remediation (machine eviction).
/// - `Warn` -> HTTP 400; the machine remains in the pool.
/// - `Log` -> informational only, never surfaced as a request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorLevel {
    Fatal,
    Warn,
    Log,
}

/// Which snapshot in `Machine::spin`'s lifecycle failed. Both phases are
/// unified under one error shape rather than carrying distinct variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotPhase {
    Before,
    After,
}

/// The leveled error type returned by every fallible core operation.
#[derive(Error, Debug)]
pub enum ProblabError {
    #[error("bet mismatch: bet-mult {bet_mult} * bet-unit {bet_unit} != bet {bet}")]
    BetMismatch {
        bet: Credits,
        bet_mult: Credits,
        bet_unit: Credits,
    },

    #[error("unknown game id {0}")]
    UnknownGame(u32),

    #[error("bet-mode {bet_mode} out of range (0..{len})")]
    BetModeOutOfRange { bet_mode: usize, len: usize },

    #[error("malformed spin request: {0}")]
    MalformedRequest(String),

    #[error("malformed PRNG snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("PRNG snapshot failed ({phase:?})")]
    SnapshotFailed { phase: SnapshotPhase },

    #[error("logic callback panicked: {0}")]
    LogicPanic(String),

    #[error("pool exhausted: {reason}")]
    PoolExhausted { reason: String },

    #[error("pool is closed: {reason}")]
    PoolClosed { reason: String },

    #[error("request canceled")]
    Canceled,

    #[error("request timed out")]
    TimedOut,

    #[error("programmer error: {0}")]
    ProgrammerError(String),
}

use crate::Credits;

impl ProblabError {
    /// The severity this error carries.
    pub fn level(&self) -> ErrorLevel {
        match self {
            ProblabError::BetMismatch { .. }
            | ProblabError::UnknownGame(_)
            | ProblabError::BetModeOutOfRange { .. }
            | ProblabError::MalformedRequest(_)
            | ProblabError::MalformedSnapshot(_)
            | ProblabError::InvalidConfig { .. } => ErrorLevel::Warn,

            ProblabError::SnapshotFailed { .. }
            | ProblabError::LogicPanic(_)
            | ProblabError::PoolExhausted { .. }
            | ProblabError::PoolClosed { .. }
            | ProblabError::ProgrammerError(_) => ErrorLevel::Fatal,

            ProblabError::Canceled | ProblabError::TimedOut => ErrorLevel::Warn,
        }
    }

    /// True if this error should evict the machine that produced it.
    pub fn is_fatal(&self) -> bool {
        self.level() == ErrorLevel::Fatal
    }
}
