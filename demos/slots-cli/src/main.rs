//! Demo binary: wires a small three-reel game through `Runtime` and
//! `Simulator`, runs a batch of spins, and prints an RTP summary.

use std::sync::Arc;

use problab_config::{
    BetTypeFamily, GameConfig, GenScreenSettings, GenStrategy, HitSettings, LineTable, ModeSetting, ReelSet,
    ReelStrip, ScreenSettings, SymbolDef, SymbolTable, SymbolType, WeightedReelSet,
};
use problab_core::ProblabError;
use problab_mode::{Game, GameLogic, SpinContext, SpinResult};
use problab_pool::LogicFactory;
use problab_prng::Pcg64;
use problab_result::Finish;
use problab_runtime::{GameEntry, Runtime};

const GAME_ID: u32 = 1;
const SPIN_COUNT: u64 = 10_000;

/// Plays the base mode to completion every spin: generate a board, score
/// it, commit one act, and end the game. A real game would branch into
/// free-spin modes, hold-and-respin, or cascades from here.
struct BaseGameLogic;

impl GameLogic for BaseGameLogic {
    fn get_result(
        &mut self,
        _ctx: &SpinContext,
        game: &mut Game,
        prng: &mut Pcg64,
        result: &mut SpinResult,
    ) -> Result<(), ProblabError> {
        let mode_id = game.base_mode_id().ok_or(ProblabError::ProgrammerError("no base mode".into()))?;
        let mode = game.mode_mut(mode_id).ok_or(ProblabError::ProgrammerError("missing mode".into()))?;
        let board = mode.generate(prng).clone();
        mode.evaluate(&board);
        mode.current_mut().add_act(Finish::Round, 0, board.as_slice(), serde_json::Value::Null)?;
        let pid = mode.yield_result();
        result.total_win = mode.result(pid).total_win;
        result.record_yield(mode_id, pid);
        result.is_game_end = true;
        Ok(())
    }
}

fn toy_config() -> GameConfig {
    let strip = ReelStrip {
        symbols: vec![0, 1, 2, 3],
        weights: vec![2, 4, 6, 10],
    };
    GameConfig {
        game_name: "toy-slots".into(),
        game_id: GAME_ID,
        logic_key: "toy-v1".into(),
        bet_units: vec![1, 2, 5, 10],
        max_win_limit: 1_000_000,
        modes: vec![ModeSetting {
            mode_name: "base".into(),
            mode_id: 0,
            gen_screen: GenScreenSettings {
                screen: ScreenSettings { columns: 5, rows: 3 },
                strategy: GenStrategy::ByReelIndex,
                reel_sets: vec![WeightedReelSet {
                    reel_set: ReelSet {
                        strips: vec![strip; 5],
                    },
                    weight: 1,
                }],
            },
            symbol: SymbolTable {
                symbols: vec![
                    SymbolDef {
                        id: 0,
                        symbol_type: SymbolType::Wild,
                        pay_table: vec![0, 0, 0, 20, 100],
                    },
                    SymbolDef {
                        id: 1,
                        symbol_type: SymbolType::High,
                        pay_table: vec![0, 0, 0, 10, 50],
                    },
                    SymbolDef {
                        id: 2,
                        symbol_type: SymbolType::High,
                        pay_table: vec![0, 0, 0, 5, 25],
                    },
                    SymbolDef {
                        id: 3,
                        symbol_type: SymbolType::Low,
                        pay_table: vec![0, 0, 0, 2, 10],
                    },
                ],
            },
            hit: HitSettings {
                bet_type: BetTypeFamily::WayBoth,
                line_table: None,
            },
            fixed: serde_json::Value::Null,
        }],
    }
}

fn main() -> anyhow::Result<()> {
    problab_core::log();

    let runtime = Runtime::build(vec![GameEntry {
        config: toy_config(),
        pool_size: 4,
        seed: 42,
        logic_factory: Arc::new(|| Box::new(BaseGameLogic)) as LogicFactory,
    }])?;

    let request = problab_machine::SpinRequest {
        uid: "slots-cli".into(),
        game_name: "toy-slots".into(),
        game_id: GAME_ID,
        bet: 1,
        bet_mode: 0,
        bet_mult: 1,
        cycle: 0,
        choice: None,
        start_state: None,
    };

    let stats = problab_sim::run_runtime(&runtime, &request, SPIN_COUNT)?;

    println!("spins:     {}", stats.spins);
    println!("total bet: {}", stats.total_bet);
    println!("total win: {}", stats.total_win);
    println!("hit rate:  {:.2}%", stats.hit_rate() * 100.0);
    println!("rtp:       {:.2}%", stats.rtp() * 100.0);

    for (game_id, metrics) in runtime.metrics() {
        println!(
            "game {game_id}: pool_size={} available={} rebuilds={} panics={}",
            metrics.pool_size, metrics.available, metrics.rebuilds, metrics.panics
        );
    }

    runtime.close("demo_complete");
    Ok(())
}
