use problab_core::ProblabError;
use problab_machine::{Machine, SpinRequest};
use problab_pool::{MachinePool, SpinCtx};
use problab_runtime::Runtime;

use crate::stats::SimStats;

/// Drives `n` spins through a single bare [`Machine`] using the
/// validation-free `spin_internal` path, a single-threaded batch-mode
/// driver. A logic error aborts the run; a panic propagates (there is no
/// pool here to catch it).
pub fn run_machine(machine: &Machine, bet_mode: usize, n: u64) -> Result<SimStats, ProblabError> {
    let mut stats = SimStats::new();
    for _ in 0..n {
        let outcome = machine.spin_internal(bet_mode)?;
        stats.record(outcome.bet, outcome.total_win);
    }
    Ok(stats)
}

/// Drives `n` spins through a [`MachinePool`], one request at a time,
/// exercising the same acquire/spin/return path a live server would. A spin
/// that returns an error aborts the run and surfaces the error.
pub fn run_pool(pool: &MachinePool, request: &SpinRequest, n: u64) -> Result<SimStats, ProblabError> {
    let mut stats = SimStats::new();
    for _ in 0..n {
        let outcome = pool.spin(&SpinCtx::none(), request)?;
        stats.record(outcome.bet, outcome.total_win);
    }
    Ok(stats)
}

/// Drives `n` spins through a [`Runtime`], routing every request by its
/// `game_id` the way an external caller would.
pub fn run_runtime(runtime: &Runtime, request: &SpinRequest, n: u64) -> Result<SimStats, ProblabError> {
    let mut stats = SimStats::new();
    for _ in 0..n {
        let outcome = runtime.spin(&SpinCtx::none(), request)?;
        stats.record(outcome.bet, outcome.total_win);
    }
    Ok(stats)
}
