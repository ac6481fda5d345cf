use std::collections::BTreeMap;

use crate::game_mode::GameMode;
use problab_config::GameConfig;
use problab_core::{ProblabError, Seq};

/// A game's composed set of modes, keyed by `mode_id`. Owns no `GameLogic`
/// and no PRNG — those belong to `Machine`, which drives this type through
/// a `GameLogic::get_result` call each spin.
pub struct Game {
    config: GameConfig,
    modes: BTreeMap<Seq, GameMode>,
}

impl Game {
    pub fn build(config: GameConfig) -> Result<Self, ProblabError> {
        config.validate().map_err(|reason| ProblabError::InvalidConfig { reason })?;
        let mut modes = BTreeMap::new();
        for setting in &config.modes {
            modes.insert(setting.mode_id, GameMode::build(setting)?);
        }
        Ok(Self { config, modes })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self, mode_id: Seq) -> Option<&GameMode> {
        self.modes.get(&mode_id)
    }

    pub fn mode_mut(&mut self, mode_id: Seq) -> Option<&mut GameMode> {
        self.modes.get_mut(&mode_id)
    }

    /// Returns the mode a `GameLogic` should start a fresh spin in — the
    /// lowest-numbered configured mode, conventionally the base game.
    pub fn base_mode_id(&self) -> Option<Seq> {
        self.modes.keys().next().copied()
    }

    /// Resets every mode's result pool cursor ahead of a new spin.
    pub fn reset(&mut self) {
        for mode in self.modes.values_mut() {
            mode.reset_game_mode_result();
        }
    }
}
