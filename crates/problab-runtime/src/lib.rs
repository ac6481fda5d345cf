//! `Runtime`: the game-id -> `MachinePool` catalog.
//!
//! Construction is build-time-validated: every registered game gets a pool
//! eagerly, and the first build failure aborts the whole `Runtime::build`
//! call (closing any pools already constructed) rather than leaving a
//! partially-served catalog. `Runtime` owns no HTTP/transport concerns —
//! routing by `game_id` and enforcing the closed/canceled lifecycle is the
//! entire surface.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use problab_config::GameConfig;
use problab_core::ProblabError;
use problab_machine::{SpinOutcome, SpinRequest};
use problab_pool::{LogicFactory, MachinePool, PoolMetrics, SpinCtx};

/// One game's registration: its static configuration, the pool size to
/// build for it, the initial seed its `SeedMaker` derives from, and a
/// factory for fresh `GameLogic` instances (one per machine, since logic
/// callbacks are `&mut self` and exclusive to their machine).
pub struct GameEntry {
    pub config: GameConfig,
    pub pool_size: usize,
    pub seed: i64,
    pub logic_factory: LogicFactory,
}

/// Frozen catalog of games, each bound to its own `MachinePool`.
pub struct Runtime {
    pools: HashMap<u32, MachinePool>,
    closed: AtomicBool,
}

impl Runtime {
    /// Builds one pool per entry. On the first failure, every pool already
    /// constructed in this call is closed before the error is returned —
    /// no half-built runtime is ever handed back to the caller.
    pub fn build(entries: Vec<GameEntry>) -> Result<Self, ProblabError> {
        let mut pools = HashMap::with_capacity(entries.len());
        for entry in entries {
            let game_id = entry.config.game_id;
            match MachinePool::build(entry.pool_size, entry.seed, entry.config, entry.logic_factory) {
                Ok(pool) => {
                    if pools.insert(game_id, pool).is_some() {
                        for pool in pools.values() {
                            pool.close("runtime_build_failed");
                        }
                        return Err(ProblabError::InvalidConfig {
                            reason: format!("duplicate game id {game_id} in catalog"),
                        });
                    }
                }
                Err(e) => {
                    for pool in pools.values() {
                        pool.close("runtime_build_failed");
                    }
                    return Err(e);
                }
            }
        }
        Ok(Self {
            pools,
            closed: AtomicBool::new(false),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Closes every pool in the catalog and marks the runtime itself
    /// closed. Idempotent.
    pub fn close(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.closed.store(true, Ordering::Release);
        for pool in self.pools.values() {
            pool.close(reason.clone());
        }
    }

    /// Routes a request by `request.game_id`; fails warn on an unknown id,
    /// fatal if the runtime itself is closed.
    pub fn spin(&self, ctx: &SpinCtx, request: &SpinRequest) -> Result<SpinOutcome, ProblabError> {
        if self.is_closed() {
            return Err(ProblabError::PoolClosed {
                reason: "runtime is closed".into(),
            });
        }
        if ctx.is_canceled() {
            return Err(ProblabError::Canceled);
        }
        let pool = self.pools.get(&request.game_id).ok_or(ProblabError::UnknownGame(request.game_id))?;
        pool.spin(ctx, request)
    }

    pub fn pool(&self, game_id: u32) -> Option<&MachinePool> {
        self.pools.get(&game_id)
    }

    pub fn metrics(&self) -> HashMap<u32, PoolMetrics> {
        self.pools.iter().map(|(id, pool)| (*id, pool.metrics())).collect()
    }

    pub fn game_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.pools.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use problab_config::{
        BetTypeFamily, GenScreenSettings, GenStrategy, HitSettings, LineTable, ModeSetting, ReelSet, ReelStrip,
        ScreenSettings, SymbolDef, SymbolTable, SymbolType, WeightedReelSet,
    };
    use problab_mode::{Game, GameLogic, SpinContext, SpinResult};
    use problab_prng::Pcg64;
    use std::sync::Arc;

    struct NoopLogic;
    impl GameLogic for NoopLogic {
        fn get_result(
            &mut self,
            _ctx: &SpinContext,
            game: &mut Game,
            prng: &mut Pcg64,
            result: &mut SpinResult,
        ) -> Result<(), ProblabError> {
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

    fn config(game_id: u32) -> GameConfig {
        GameConfig {
            game_name: format!("demo-{game_id}"),
            game_id,
            logic_key: "demo-v1".into(),
            bet_units: vec![1],
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
                        pay_table: vec![0, 0, 5],
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

    fn entry(game_id: u32) -> GameEntry {
        GameEntry {
            config: config(game_id),
            pool_size: 2,
            seed: 1,
            logic_factory: Arc::new(|| Box::new(NoopLogic)),
        }
    }

    fn request(game_id: u32) -> SpinRequest {
        SpinRequest {
            uid: "u".into(),
            game_name: format!("demo-{game_id}"),
            game_id,
            bet: 1,
            bet_mode: 0,
            bet_mult: 1,
            cycle: 0,
            choice: None,
            start_state: None,
        }
    }

    #[test]
    fn build_registers_one_pool_per_game() {
        let rt = Runtime::build(vec![entry(1), entry(2)]).unwrap();
        assert!(rt.pool(1).is_some());
        assert!(rt.pool(2).is_some());
        assert!(rt.pool(3).is_none());
    }

    #[test]
    fn build_rejects_duplicate_game_ids() {
        let err = Runtime::build(vec![entry(1), entry(1)]).unwrap_err();
        assert!(matches!(err, ProblabError::InvalidConfig { .. }));
    }

    #[test]
    fn spin_routes_to_owning_pool() {
        let rt = Runtime::build(vec![entry(1), entry(2)]).unwrap();
        let outcome = rt.spin(&SpinCtx::none(), &request(2)).unwrap();
        assert_eq!(outcome.game_id, 2);
    }

    #[test]
    fn spin_rejects_unknown_game_id() {
        let rt = Runtime::build(vec![entry(1)]).unwrap();
        let err = rt.spin(&SpinCtx::none(), &request(99)).unwrap_err();
        assert!(matches!(err, ProblabError::UnknownGame(99)));
    }

    #[test]
    fn close_prevents_further_spins() {
        let rt = Runtime::build(vec![entry(1)]).unwrap();
        rt.close("shutdown");
        let err = rt.spin(&SpinCtx::none(), &request(1)).unwrap_err();
        assert!(matches!(err, ProblabError::PoolClosed { .. }));
        assert!(rt.pool(1).unwrap().is_closed());
    }
}
