use problab_core::{ActTag, Credits, Seq};
use serde::{Deserialize, Serialize};

/// Commit granularity passed to [`crate::GameModeResult::add_act`]: how far
/// up the Round/Step/Act hierarchy this commit closes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finish {
    Act,
    Step,
    Round,
}

/// One committed, immutable game event. `details_start`/`details_end` and
/// `screen_start` index into the owning [`crate::GameModeResult`]'s arenas;
/// the slice they name does not change after commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    pub act_type: ActTag,
    pub round_id: Seq,
    pub step_id: Seq,
    pub act_id: Seq,
    pub is_round_end: bool,
    pub is_step_end: bool,
    pub win: Credits,
    pub acc_total_win: Credits,
    pub acc_round_win: Credits,
    pub acc_step_win: Credits,
    pub details_start: u32,
    pub details_end: u32,
    pub screen_start: Option<u32>,
    #[serde(default)]
    pub extension: serde_json::Value,
}
