use std::panic::AssertUnwindSafe;
use std::sync::Mutex;

use problab_config::GameConfig;
use problab_core::{Credits, ProblabError, Seq};
use problab_mode::{Game, GameLogic, SpinContext, SpinResult};
use problab_prng::{Pcg64, Prng};

use crate::request::{ModeOutcome, SpinOutcome, SpinRequest};

struct MachineState {
    prng: Pcg64,
    game: Game,
    logic: Box<dyn GameLogic>,
    scratch: SpinResult,
}

/// Single-spin execution unit: one PRNG stream, one configured [`Game`],
/// one `GameLogic`, and the reusable request/result scratch. **Not** safe
/// for concurrent use — exactly one spin runs against a `Machine` at a
/// time; an internal mutex enforces this rather than relying purely on
/// caller discipline, since a `MachinePool` hands out `Arc<Machine>`-style
/// shared ownership to a single borrowing task at a time.
pub struct Machine {
    id: Seq,
    game_id: u32,
    game_name: String,
    logic_key: String,
    seed: i64,
    state: Mutex<MachineState>,
}

impl Machine {
    pub fn build(id: Seq, seed: i64, config: GameConfig, logic: Box<dyn GameLogic>) -> Result<Self, ProblabError> {
        let game_id = config.game_id;
        let game_name = config.game_name.clone();
        let logic_key = config.logic_key.clone();
        let game = Game::build(config)?;
        Ok(Self {
            id,
            game_id,
            game_name,
            logic_key,
            seed,
            state: Mutex::new(MachineState {
                prng: Pcg64::seed_from_i64(seed),
                game,
                logic,
                scratch: SpinResult::new(),
            }),
        })
    }

    pub fn id(&self) -> Seq {
        self.id
    }

    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    pub fn game_name(&self) -> &str {
        &self.game_name
    }

    pub fn logic_key(&self) -> &str {
        &self.logic_key
    }

    /// The seed this machine was constructed with, kept for audit — not
    /// the current stream position, which only `Snapshot` exposes.
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Full request path: validate, snapshot, run the logic, snapshot
    /// again, and revert if the request pinned a starting snapshot.
    pub fn spin(&self, request: &SpinRequest) -> Result<SpinOutcome, ProblabError> {
        let mut state = self.state.lock().unwrap_or_else(|poison| poison.into_inner());
        self.validate(request, &state.game)?;

        let ctx = SpinContext {
            bet_mode: request.bet_mode,
            bet: request.bet,
            bet_mult: request.bet_mult,
            cycle: request.cycle,
            choice: request.choice,
        };
        let start_override = request.start_state.as_ref().map(|s| s.start_snap_bytes.clone());
        let outcome = Self::execute(&mut state, ctx, start_override.as_deref())?;

        Ok(SpinOutcome {
            uid: request.uid.clone(),
            game_name: request.game_name.clone(),
            game_id: request.game_id,
            bet: request.bet,
            bet_mode: request.bet_mode,
            bet_mult: request.bet_mult,
            total_win: outcome.total_win,
            is_game_end: outcome.is_game_end,
            checkpoint: outcome.checkpoint,
            modes: outcome.modes,
            start_snap: outcome.start_snap,
            after_snap: outcome.after_snap,
        })
    }

    /// Validation-free, DTO-free spin path for simulators driving millions
    /// of spins per second: `bet_mult` is fixed at 1 and `bet` is derived
    /// from the mode's own bet-unit table, so no caller-supplied bet fields
    /// can ever mismatch. Never call this from a production request path.
    pub fn spin_internal(&self, bet_mode: usize) -> Result<SpinOutcome, ProblabError> {
        let mut state = self.state.lock().unwrap_or_else(|poison| poison.into_inner());
        let bet_unit = *state
            .game
            .config()
            .bet_units
            .get(bet_mode)
            .ok_or(ProblabError::BetModeOutOfRange {
                bet_mode,
                len: state.game.config().bet_units.len(),
            })?;
        let ctx = SpinContext {
            bet_mode,
            bet: bet_unit,
            bet_mult: 1,
            cycle: 0,
            choice: None,
        };
        let outcome = Self::execute(&mut state, ctx, None)?;
        Ok(SpinOutcome {
            uid: String::new(),
            game_name: self.game_name.clone(),
            game_id: self.game_id,
            bet: bet_unit,
            bet_mode,
            bet_mult: 1,
            total_win: outcome.total_win,
            is_game_end: outcome.is_game_end,
            checkpoint: outcome.checkpoint,
            modes: outcome.modes,
            start_snap: outcome.start_snap,
            after_snap: outcome.after_snap,
        })
    }

    fn validate(&self, request: &SpinRequest, game: &Game) -> Result<(), ProblabError> {
        if request.game_id != self.game_id || request.game_name != self.game_name {
            return Err(ProblabError::UnknownGame(request.game_id));
        }
        let bet_units = &game.config().bet_units;
        let bet_unit = *bet_units.get(request.bet_mode).ok_or(ProblabError::BetModeOutOfRange {
            bet_mode: request.bet_mode,
            len: bet_units.len(),
        })?;
        let expected = request.bet_mult * bet_unit;
        if expected != request.bet {
            return Err(ProblabError::BetMismatch {
                bet: request.bet,
                bet_mult: request.bet_mult,
                bet_unit,
            });
        }
        Ok(())
    }

    /// The shared core of `spin`/`spin_internal`: snapshot, run the logic
    /// under `catch_unwind`, snapshot again, optionally rewind.
    fn execute(
        state: &mut MachineState,
        ctx: SpinContext,
        start_override: Option<&[u8]>,
    ) -> Result<ExecuteOutcome, ProblabError> {
        let rewind = state.prng.snapshot();
        let effective_start = match start_override {
            Some(bytes) => {
                if let Err(e) = state.prng.restore(bytes) {
                    // A malformed snapshot is state-recoverable: rewind and
                    // surface a warn-level error.
                    let _ = state.prng.restore(&rewind);
                    return Err(e);
                }
                bytes.to_vec()
            }
            None => rewind.clone(),
        };

        state.game.reset();
        state.scratch.reset();

        let MachineState { game, logic, scratch, prng } = state;
        let panic_result = std::panic::catch_unwind(AssertUnwindSafe(|| logic.get_result(&ctx, game, prng, scratch)));

        let logic_err = match panic_result {
            Err(payload) => Some(ProblabError::LogicPanic(panic_message(payload))),
            Ok(Err(e)) => Some(e),
            Ok(Ok(())) => None,
        };
        if let Some(e) = logic_err {
            let _ = state.prng.restore(&rewind);
            return Err(e);
        }

        let after_snap = state.prng.snapshot();

        let modes = state
            .scratch
            .yielded
            .iter()
            .filter_map(|y| {
                state
                    .game
                    .mode(y.mode_id)
                    .map(|mode| ModeOutcome {
                        mode_id: y.mode_id,
                        result: mode.result(y.pid).clone(),
                    })
            })
            .collect();

        // Caller-controlled reproduction must not leak into machine state:
        // rewind if this call was replaying a caller-supplied snapshot.
        if start_override.is_some() {
            if state.prng.restore(&rewind).is_err() {
                return Err(ProblabError::SnapshotFailed {
                    phase: problab_core::SnapshotPhase::After,
                });
            }
        }

        Ok(ExecuteOutcome {
            total_win: state.scratch.total_win,
            is_game_end: state.scratch.is_game_end,
            checkpoint: state.scratch.checkpoint.clone(),
            modes,
            start_snap: effective_start,
            after_snap,
        })
    }
}

struct ExecuteOutcome {
    total_win: Credits,
    is_game_end: bool,
    checkpoint: serde_json::Value,
    modes: Vec<ModeOutcome>,
    start_snap: Vec<u8>,
    after_snap: Vec<u8>,
}

/// Extracts a displayable message from a `catch_unwind` payload, the way
/// `std::panic::Location`-less panics usually carry either a `&str` or a
/// `String`.
fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "logic callback panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use problab_config::{
        BetTypeFamily, GenScreenSettings, GenStrategy, HitSettings, LineTable, ModeSetting, ReelSet, ReelStrip,
        ScreenSettings, SymbolDef, SymbolTable, SymbolType,
    };
    use problab_mode::SpinContext as Ctx;

    struct AlwaysBaseLogic;
    impl GameLogic for AlwaysBaseLogic {
        fn get_result(
            &mut self,
            _ctx: &Ctx,
            game: &mut Game,
            prng: &mut Pcg64,
            result: &mut SpinResult,
        ) -> Result<(), ProblabError> {
            let mode_id = game.base_mode_id().unwrap();
            let mode = game.mode_mut(mode_id).unwrap();
            let board = mode.generate(prng).clone();
            mode.evaluate(&board);
            mode.current_mut()
                .add_act(problab_result::Finish::Round, 0, board.as_slice(), serde_json::Value::Null)
                .unwrap();
            let pid = mode.yield_result();
            result.record_yield(mode_id, pid);
            result.total_win = mode.result(pid).total_win;
            result.is_game_end = true;
            Ok(())
        }
    }

    struct PanicsOnBetMode1;
    impl GameLogic for PanicsOnBetMode1 {
        fn get_result(
            &mut self,
            ctx: &Ctx,
            _game: &mut Game,
            _prng: &mut Pcg64,
            _result: &mut SpinResult,
        ) -> Result<(), ProblabError> {
            if ctx.bet_mode == 1 {
                panic!("boom");
            }
            Ok(())
        }
    }

    fn config() -> GameConfig {
        GameConfig {
            game_name: "demo".into(),
            game_id: 7,
            logic_key: "demo-v1".into(),
            bet_units: vec![1, 2],
            max_win_limit: 1_000_000,
            modes: vec![ModeSetting {
                mode_name: "base".into(),
                mode_id: 0,
                gen_screen: GenScreenSettings {
                    screen: ScreenSettings { columns: 3, rows: 1 },
                    strategy: GenStrategy::ByReelIndex,
                    reel_sets: vec![problab_config::WeightedReelSet {
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

    fn request(machine: &Machine, bet_mode: usize, bet_mult: Credits) -> SpinRequest {
        SpinRequest {
            uid: "u1".into(),
            game_name: machine.game_name().to_string(),
            game_id: machine.game_id(),
            bet: bet_mult * [1, 2][bet_mode],
            bet_mode,
            bet_mult,
            cycle: 0,
            choice: None,
            start_state: None,
        }
    }

    #[test]
    fn spin_validates_bet_mismatch() {
        let machine = Machine::build(0, 1, config(), Box::new(AlwaysBaseLogic)).unwrap();
        let mut req = request(&machine, 0, 1);
        req.bet = 999;
        assert!(matches!(machine.spin(&req), Err(ProblabError::BetMismatch { .. })));
    }

    #[test]
    fn spin_validates_unknown_game() {
        let machine = Machine::build(0, 1, config(), Box::new(AlwaysBaseLogic)).unwrap();
        let mut req = request(&machine, 0, 1);
        req.game_id = 999;
        assert!(matches!(machine.spin(&req), Err(ProblabError::UnknownGame(_))));
    }

    #[test]
    fn spin_produces_total_win_from_all_high_board() {
        let machine = Machine::build(0, 1, config(), Box::new(AlwaysBaseLogic)).unwrap();
        let req = request(&machine, 0, 1);
        let outcome = machine.spin(&req).unwrap();
        assert_eq!(outcome.total_win, 9);
        assert_eq!(outcome.modes.len(), 1);
    }

    #[test]
    fn spin_replay_with_start_snap_reverts_machine_state() {
        let machine = Machine::build(0, 1, config(), Box::new(AlwaysBaseLogic)).unwrap();
        let req = request(&machine, 0, 1);
        let first = machine.spin(&req).unwrap();

        let mut replay_req = request(&machine, 0, 1);
        replay_req.start_state = Some(crate::request::StartState {
            start_snap_bytes: first.start_snap.clone(),
            checkpoint: serde_json::Value::Null,
        });
        let second = machine.spin(&replay_req).unwrap();
        assert_eq!(first.total_win, second.total_win);
        assert_eq!(first.after_snap, second.after_snap);
    }

    #[test]
    fn panic_in_logic_is_caught_and_reported_fatal() {
        let machine = Machine::build(0, 1, config(), Box::new(PanicsOnBetMode1)).unwrap();
        let ok_req = request(&machine, 0, 1);
        assert!(machine.spin(&ok_req).is_ok());

        let bad_req = request(&machine, 1, 1);
        let err = machine.spin(&bad_req).unwrap_err();
        assert!(matches!(err, ProblabError::LogicPanic(_)));
        assert_eq!(err.level(), problab_core::ErrorLevel::Fatal);
    }

    #[test]
    fn spin_internal_bypasses_validation() {
        let machine = Machine::build(0, 1, config(), Box::new(AlwaysBaseLogic)).unwrap();
        let outcome = machine.spin_internal(1).unwrap();
        assert_eq!(outcome.bet, 2);
        assert_eq!(outcome.bet_mult, 1);
    }
}
