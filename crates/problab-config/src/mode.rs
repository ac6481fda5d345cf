use crate::line::LineTable;
use crate::screen::GenScreenSettings;
use crate::symbol::SymbolTable;
use serde::{Deserialize, Serialize};

/// Determines which [`problab_calc`](../problab_calc/index.html) evaluator
/// a mode runs. Line variants require a [`LineTable`]; Way/Count/Cluster do
/// not use one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BetTypeFamily {
    LineLtr,
    LineRtl,
    LineBoth,
    WayLtr,
    WayRtl,
    WayBoth,
    Count,
    Cluster,
}

impl BetTypeFamily {
    pub fn requires_line_table(&self) -> bool {
        matches!(self, Self::LineLtr | Self::LineRtl | Self::LineBoth)
    }
}

/// Bet-type-family selection plus its bet-type-specific configuration.
/// `line_table` is populated only for the `Line*` families; other families
/// derive their scratch layout purely from [`SymbolTable`]/[`GenScreenSettings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitSettings {
    pub bet_type: BetTypeFamily,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_table: Option<LineTable>,
}

impl HitSettings {
    pub fn validate(&self, columns: usize, rows: usize) -> Result<(), String> {
        match (&self.line_table, self.bet_type.requires_line_table()) {
            (Some(table), true) => table.validate(columns, rows),
            (None, true) => Err(format!("{:?} requires a line table", self.bet_type)),
            (Some(_), false) => Err(format!(
                "{:?} must not declare a line table",
                self.bet_type
            )),
            (None, false) => Ok(()),
        }
    }
}

/// One game mode's full static configuration: generation, symbols, bet
/// type, and an opaque extension payload for logic-specific parameters
/// (e.g. free-spin trigger counts) that this crate intentionally does not
/// model — callers own their own `GameLogic`-specific schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeSetting {
    pub mode_name: String,
    pub mode_id: u32,
    pub gen_screen: GenScreenSettings,
    pub symbol: SymbolTable,
    pub hit: HitSettings,
    #[serde(default)]
    pub fixed: serde_json::Value,
}

impl ModeSetting {
    pub fn validate(&self) -> Result<(), String> {
        self.gen_screen.validate()?;
        self.symbol.validate()?;
        self.hit
            .validate(self.gen_screen.screen.columns, self.gen_screen.screen.rows)
    }
}

/// A full game's configuration: identity, bet structure, and its modes
/// (base game plus any bonus/free-spin modes a `GameLogic` transitions
/// through in one spin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub game_name: String,
    pub game_id: u32,
    pub logic_key: String,
    pub bet_units: Vec<i64>,
    pub max_win_limit: i64,
    pub modes: Vec<ModeSetting>,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.bet_units.is_empty() {
            return Err("game must declare at least one bet unit".into());
        }
        if self.bet_units.iter().any(|&u| u <= 0) {
            return Err("bet units must be positive".into());
        }
        let max_bet_unit = *self.bet_units.iter().max().expect("checked non-empty above");
        if self.max_win_limit < max_bet_unit {
            return Err(format!(
                "max_win_limit {} must be >= the largest bet unit {max_bet_unit}",
                self.max_win_limit
            ));
        }
        if self.modes.is_empty() {
            return Err("game must declare at least one mode".into());
        }
        for mode in &self.modes {
            mode.validate()
                .map_err(|e| format!("mode '{}': {e}", mode.mode_name))?;
        }
        Ok(())
    }

    pub fn mode(&self, mode_id: u32) -> Option<&ModeSetting> {
        self.modes.iter().find(|m| m.mode_id == mode_id)
    }
}
