use crate::game::Game;
use crate::spin::SpinResult;
use problab_core::{Credits, ProblabError};
use problab_prng::Pcg64;

/// The logic-relevant subset of a spin request: everything a `GameLogic`
/// needs to decide what happens, stripped of wire/identity fields (`uid`,
/// `game-name`, `game-id`, `start-state`) that are `Machine`'s concern.
#[derive(Debug, Clone, Copy)]
pub struct SpinContext {
    pub bet_mode: usize,
    pub bet: Credits,
    pub bet_mult: Credits,
    pub cycle: u32,
    pub choice: Option<i64>,
}

/// A game's behavior: given a request and the composed generator/
/// calculator set, drive zero or more `GameMode`s to produce the spin's
/// results. Implementations call concrete calculator/buffer methods
/// directly rather than going through detail-level dynamic dispatch — the
/// callback itself is the only indirection in the hot path.
///
/// Bound to the concrete [`Pcg64`] rather than generic over [`problab_prng::Prng`]
/// so implementations can be boxed and dispatched by `logic-key` without
/// losing object safety. `result.total_win`/`is_game_end`/`yielded`/
/// `checkpoint` are this callback's to set; `start_snap`/`after_snap` are
/// `Machine`'s.
pub trait GameLogic: Send {
    fn get_result(
        &mut self,
        ctx: &SpinContext,
        game: &mut Game,
        prng: &mut Pcg64,
        result: &mut SpinResult,
    ) -> Result<(), ProblabError>;
}
