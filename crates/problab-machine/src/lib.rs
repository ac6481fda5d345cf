//! `Machine`: one PRNG stream, one configured [`problab_mode::Game`], and
//! the reusable spin scratch that binds them into a single-spin execution
//! unit.
//!
//! A `Machine` is **not** safe for concurrent use — [`problab_pool`] is the
//! layer that gives many machines bounded, self-healing concurrency.
mod machine;
mod request;

pub use machine::Machine;
pub use request::{ModeOutcome, SpinOutcome, SpinRequest, StartState};
