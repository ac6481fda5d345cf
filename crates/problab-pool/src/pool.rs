use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};

use problab_config::GameConfig;
use problab_core::{ProblabError, Seq, POOL_BROKEN_CHANNEL_CAP};
use problab_machine::{Machine, SpinOutcome, SpinRequest};
use problab_mode::GameLogic;

use crate::ctx::SpinCtx;
use crate::seed::SeedMaker;

/// How long `acquire` waits on the healthy channel between checks of
/// `closed`/cancellation/deadline. Small enough that cancellation is
/// observed promptly; this is a polling loop rather than a single blocking
/// receive because the wait must also race a caller-supplied deadline and
/// cancel flag that crossbeam's channel API has no direct way to select
/// against without an extra signaling channel per call.
const POLL_INTERVAL: Duration = Duration::from_millis(2);

/// Builds a fresh `GameLogic` instance for each machine a pool constructs
/// or rebuilds. Boxed so a `Runtime` can hold one pool per game without a
/// generic parameter per game's logic type.
pub type LogicFactory = Arc<dyn Fn() -> Box<dyn GameLogic> + Send + Sync>;

/// Snapshot of pool state taken at the moment `close` was called, so
/// observers of `closed == true` can also see what was in flight at the
/// time close happened rather than whatever the counters read later.
#[derive(Debug, Clone, Copy)]
pub struct CloseSnapshot {
    pub in_flight: usize,
    pub available: usize,
    pub broken_backlog: usize,
}

/// Readable snapshot of a pool's health.
#[derive(Debug, Clone)]
pub struct PoolMetrics {
    pub pool_size: usize,
    pub available: usize,
    pub in_flight: usize,
    pub broken_backlog: usize,
    pub rebuilds: usize,
    pub panics: usize,
    pub fatals: usize,
    pub closed: bool,
    pub close_reason: Option<String>,
    pub at_close: Option<CloseSnapshot>,
}

/// Bounded, self-healing set of machines for one game. Machines are
/// exclusive to the spin borrowing them (channel receive is the hand-off);
/// a machine that raises a fatal error or panics is evicted and replaced
/// with a freshly seeded one, never degrading the pool below `pool_size`
/// unless the broken-backlog itself saturates.
pub struct MachinePool {
    game_id: u32,
    target_size: usize,
    healthy_tx: Sender<Machine>,
    healthy_rx: Receiver<Machine>,
    broken_tx: Sender<Machine>,
    broken_rx: Receiver<Machine>,
    in_flight: AtomicUsize,
    rebuilds: AtomicUsize,
    panics: AtomicUsize,
    fatals: AtomicUsize,
    closed: AtomicBool,
    close_reason: OnceLock<String>,
    close_at: OnceLock<CloseSnapshot>,
    seed_maker: SeedMaker,
    config: GameConfig,
    logic_factory: LogicFactory,
    next_machine_id: AtomicU32,
}

impl MachinePool {
    pub fn build(size: usize, seed: i64, config: GameConfig, logic_factory: LogicFactory) -> Result<Self, ProblabError> {
        if size == 0 {
            return Err(ProblabError::InvalidConfig {
                reason: "pool size must be positive".into(),
            });
        }
        config.validate().map_err(|reason| ProblabError::InvalidConfig { reason })?;

        let (healthy_tx, healthy_rx) = bounded(size);
        let (broken_tx, broken_rx) = bounded(POOL_BROKEN_CHANNEL_CAP);
        let pool = Self {
            game_id: config.game_id,
            target_size: size,
            healthy_tx,
            healthy_rx,
            broken_tx,
            broken_rx,
            in_flight: AtomicUsize::new(0),
            rebuilds: AtomicUsize::new(0),
            panics: AtomicUsize::new(0),
            fatals: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
            close_reason: OnceLock::new(),
            close_at: OnceLock::new(),
            seed_maker: SeedMaker::new(seed),
            config,
            logic_factory,
            next_machine_id: AtomicU32::new(0),
        };
        for _ in 0..size {
            let machine = pool.fresh_machine()?;
            pool.healthy_tx
                .try_send(machine)
                .map_err(|_| ProblabError::ProgrammerError("healthy channel capacity exceeded during build".into()))?;
        }
        Ok(pool)
    }

    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub fn close_reason(&self) -> Option<String> {
        self.close_reason.get().cloned()
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            pool_size: self.target_size,
            available: self.healthy_rx.len(),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            broken_backlog: self.broken_rx.len(),
            rebuilds: self.rebuilds.load(Ordering::Relaxed),
            panics: self.panics.load(Ordering::Relaxed),
            fatals: self.fatals.load(Ordering::Relaxed),
            closed: self.is_closed(),
            close_reason: self.close_reason(),
            at_close: self.close_at.get().copied(),
        }
    }

    /// One-shot latch: the first caller to close wins, and the snapshot it
    /// takes is final. Safe to call repeatedly (e.g. from multiple eviction
    /// paths racing each other).
    pub fn close(&self, reason: impl Into<String>) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let _ = self.close_reason.set(reason.into());
        let _ = self.close_at.set(CloseSnapshot {
            in_flight: self.in_flight.load(Ordering::Relaxed),
            available: self.healthy_rx.len(),
            broken_backlog: self.broken_rx.len(),
        });
        log::warn!(
            "machine pool for game {} closed: {}",
            self.game_id,
            self.close_reason().unwrap_or_default()
        );
    }

    /// Borrows a machine, runs the request, and returns the machine to
    /// service (or evicts it).
    pub fn spin(&self, ctx: &SpinCtx, request: &SpinRequest) -> Result<SpinOutcome, ProblabError> {
        if self.is_closed() {
            return Err(ProblabError::PoolClosed {
                reason: self.close_reason().unwrap_or_default(),
            });
        }
        let machine = self.acquire(ctx)?;
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| machine.spin(request)));
        self.in_flight.fetch_sub(1, Ordering::Relaxed);

        match outcome {
            Err(payload) => {
                self.panics.fetch_add(1, Ordering::Relaxed);
                self.evict_and_replace(machine);
                Err(ProblabError::LogicPanic(panic_message(payload)))
            }
            Ok(Ok(result)) => {
                self.return_healthy(machine);
                Ok(result)
            }
            Ok(Err(e)) => {
                if matches!(e, ProblabError::LogicPanic(_)) {
                    self.panics.fetch_add(1, Ordering::Relaxed);
                    self.evict_and_replace(machine);
                } else if e.is_fatal() {
                    self.fatals.fetch_add(1, Ordering::Relaxed);
                    self.evict_and_replace(machine);
                } else {
                    self.return_healthy(machine);
                }
                Err(e)
            }
        }
    }

    fn acquire(&self, ctx: &SpinCtx) -> Result<Machine, ProblabError> {
        loop {
            if self.is_closed() {
                return Err(ProblabError::PoolClosed {
                    reason: self.close_reason().unwrap_or_default(),
                });
            }
            if ctx.is_canceled() {
                return Err(ProblabError::Canceled);
            }
            if ctx.is_expired() {
                return Err(ProblabError::TimedOut);
            }
            match self.healthy_rx.recv_timeout(POLL_INTERVAL) {
                Ok(machine) => return Ok(machine),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ProblabError::PoolClosed {
                        reason: "healthy channel disconnected".into(),
                    })
                }
            }
        }
    }

    fn return_healthy(&self, machine: Machine) {
        if self.is_closed() {
            drop(machine);
            return;
        }
        // Capacity is always available: this machine's slot was never
        // returned to the channel while it was borrowed.
        let _ = self.healthy_tx.try_send(machine);
    }

    fn evict_and_replace(&self, broken: Machine) {
        if self.is_closed() {
            drop(broken);
            return;
        }
        match self.broken_tx.try_send(broken) {
            Ok(()) => {}
            Err(TrySendError::Full(m)) => {
                drop(m);
                self.close("overwhelmed_by_failures");
                return;
            }
            Err(TrySendError::Disconnected(m)) => {
                drop(m);
                return;
            }
        }
        match self.fresh_machine() {
            Ok(machine) => {
                self.rebuilds.fetch_add(1, Ordering::Relaxed);
                if self.is_closed() {
                    drop(machine);
                } else {
                    let _ = self.healthy_tx.try_send(machine);
                }
            }
            Err(e) => {
                log::error!("machine rebuild failed for game {}: {e}", self.game_id);
                self.close("rebuild_failed");
            }
        }
    }

    fn fresh_machine(&self) -> Result<Machine, ProblabError> {
        let id: Seq = self.next_machine_id.fetch_add(1, Ordering::Relaxed);
        let seed = self.seed_maker.next();
        Machine::build(id, seed, self.config.clone(), (self.logic_factory)())
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "pool caught a non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use problab_config::{
        BetTypeFamily, GenScreenSettings, GenStrategy, HitSettings, LineTable, ModeSetting, ReelSet, ReelStrip,
        ScreenSettings, SymbolDef, SymbolTable, SymbolType, WeightedReelSet,
    };
    use problab_mode::{Game, SpinContext, SpinResult};
    use problab_prng::Pcg64;
    use std::sync::atomic::AtomicBool as StdAtomicBool;
    use std::sync::Barrier;
    use std::thread;

    struct OkOnZeroPanicOnOne;
    impl GameLogic for OkOnZeroPanicOnOne {
        fn get_result(
            &mut self,
            ctx: &SpinContext,
            game: &mut Game,
            prng: &mut Pcg64,
            result: &mut SpinResult,
        ) -> Result<(), ProblabError> {
            if ctx.bet_mode == 1 {
                panic!("synthetic failure");
            }
            let mode_id = game.base_mode_id().unwrap();
            let mode = game.mode_mut(mode_id).unwrap();
            let board = mode.generate(prng).clone();
            mode.evaluate(&board);
            mode.current_mut()
                .add_act(problab_result::Finish::Round, 0, &[], serde_json::Value::Null)
                .unwrap();
            let pid = mode.yield_result();
            result.record_yield(mode_id, pid);
            result.is_game_end = true;
            Ok(())
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            game_name: "demo".into(),
            game_id: 3,
            logic_key: "demo-v1".into(),
            bet_units: vec![1, 2],
            max_win_limit: 1_000_000,
            modes: vec![ModeSetting {
                mode_name: "base".into(),
                mode_id: 0,
                gen_screen: GenScreenSettings {
                    screen: ScreenSettings { columns: 3, rows: 1 },
                    strategy: GenStrategy::ByReelIndex,
                    reel_sets: vec![WeightedReelSet {
                        reel_set: ReelSet {
                            strips: vec![
                                ReelStrip {
                                    symbols: vec![0],
                                    weights: vec![1],
                                };
                                3
                            ],
                        },
                        weight: 1,
                    }],
                },
                symbol: SymbolTable {
                    symbols: vec![SymbolDef {
                        id: 0,
                        symbol_type: SymbolType::High,
                        pay_table: vec![0, 0, 9],
                    }],
                },
                hit: HitSettings {
                    bet_type: BetTypeFamily::LineBoth,
                    line_table: Some(LineTable {
                        lines: vec![vec![0, 0, 0]],
                    }),
                },
                fixed: serde_json::Value::Null,
            }],
        }
    }

    fn request(bet_mode: usize) -> SpinRequest {
        SpinRequest {
            uid: "u".into(),
            game_name: "demo".into(),
            game_id: 3,
            bet: [1, 2][bet_mode],
            bet_mode,
            bet_mult: 1,
            cycle: 0,
            choice: None,
            start_state: None,
        }
    }

    fn factory() -> LogicFactory {
        Arc::new(|| Box::new(OkOnZeroPanicOnOne))
    }

    #[test]
    fn conservation_without_failures() {
        let pool = MachinePool::build(4, 1, config(), factory()).unwrap();
        for _ in 0..20 {
            pool.spin(&SpinCtx::none(), &request(0)).unwrap();
        }
        let m = pool.metrics();
        assert_eq!(m.rebuilds, 0);
        assert_eq!(m.available + m.in_flight, m.pool_size);
    }

    #[test]
    fn self_healing_across_threads() {
        let pool = Arc::new(MachinePool::build(8, 1, config(), factory()).unwrap());
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let pool = pool.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    let mut ok_count = 0usize;
                    let mut panic_count = 0usize;
                    for i in 0..100 / 8 {
                        let bet_mode = if (t + i) % 2 == 0 { 0 } else { 1 };
                        match pool.spin(&SpinCtx::none(), &request(bet_mode)) {
                            Ok(_) => ok_count += 1,
                            Err(ProblabError::LogicPanic(_)) => panic_count += 1,
                            Err(e) => panic!("unexpected error {e}"),
                        }
                    }
                    (ok_count, panic_count)
                })
            })
            .collect();
        let mut total_ok = 0;
        let mut total_panics = 0;
        for h in handles {
            let (ok, panics) = h.join().unwrap();
            total_ok += ok;
            total_panics += panics;
        }
        let m = pool.metrics();
        assert_eq!(m.panics, total_panics);
        assert_eq!(m.rebuilds, total_panics);
        assert_eq!(m.available + m.in_flight, m.pool_size);
        assert!(total_ok > 0);
    }

    #[test]
    fn canceled_context_never_borrows_a_machine() {
        let pool = MachinePool::build(1, 1, config(), factory()).unwrap();
        let flag = Arc::new(StdAtomicBool::new(true));
        let ctx = SpinCtx::with_cancel_flag(flag);
        let err = pool.spin(&ctx, &request(0)).unwrap_err();
        assert!(matches!(err, ProblabError::Canceled));
        assert_eq!(pool.metrics().in_flight, 0);
        assert_eq!(pool.metrics().available, 1);
    }

    #[test]
    fn closed_pool_rejects_new_spins() {
        let pool = MachinePool::build(1, 1, config(), factory()).unwrap();
        pool.close("manual_test_close");
        let err = pool.spin(&SpinCtx::none(), &request(0)).unwrap_err();
        assert!(matches!(err, ProblabError::PoolClosed { .. }));
    }
}
