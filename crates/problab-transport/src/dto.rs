use serde::{Deserialize, Serialize};

use problab_core::{ActTag, CellIndex, Combinations, Count, Credits, ProblabError, Seq, SymbolId};
use problab_machine::{ModeOutcome, SpinOutcome, SpinRequest, StartState};
use problab_result::Direction;

use crate::codec::{decode_snapshot, encode_snapshot};

/// Wire shape of `start-state`: `start_snap` is mandatory when this object
/// is present at all; `checkpoint` is opaque.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartStateDto {
    pub start_snap: String,
    #[serde(default)]
    pub checkpoint: serde_json::Value,
}

/// Wire shape of a spin request. `has_choice` disambiguates "no choice
/// made" from "chose 0" — a request with `has_choice = false` and a
/// non-null `choice` is malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinRequestDto {
    pub uid: String,
    pub game_name: String,
    pub game_id: u32,
    pub bet: Credits,
    pub bet_mode: usize,
    pub bet_mult: Credits,
    pub cycle: u32,
    #[serde(default)]
    pub has_choice: bool,
    #[serde(default)]
    pub choice: Option<i64>,
    #[serde(default)]
    pub start_state: Option<StartStateDto>,
}

impl SpinRequestDto {
    /// Decodes into the internal [`SpinRequest`] shape, enforcing the
    /// `has_choice`/`choice` invariant and base64url-decoding the start
    /// snapshot.
    pub fn into_request(self) -> Result<SpinRequest, ProblabError> {
        let choice = match (self.has_choice, self.choice) {
            (false, None) => None,
            (false, Some(0)) => None,
            (false, Some(_)) => {
                return Err(ProblabError::MalformedRequest(
                    "choice must be absent or zero when has_choice is false".into(),
                ))
            }
            (true, Some(c)) => Some(c),
            (true, None) => {
                return Err(ProblabError::MalformedRequest(
                    "has_choice is true but choice is absent".into(),
                ))
            }
        };
        let start_state = match self.start_state {
            Some(dto) => Some(StartState {
                start_snap_bytes: decode_snapshot(&dto.start_snap)?,
                checkpoint: dto.checkpoint,
            }),
            None => None,
        };
        Ok(SpinRequest {
            uid: self.uid,
            game_name: self.game_name,
            game_id: self.game_id,
            bet: self.bet,
            bet_mode: self.bet_mode,
            bet_mult: self.bet_mult,
            cycle: self.cycle,
            choice,
            start_state,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailDto {
    pub win: Credits,
    pub symbol: SymbolId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_id: Option<u32>,
    pub count: Count,
    pub combinations: Combinations,
    pub direction: Direction,
    pub hits: Vec<CellIndex>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActDto {
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<Vec<SymbolId>>,
    pub details: Vec<DetailDto>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub ext: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeResultDto {
    pub total_win: Credits,
    pub mode_id: Seq,
    pub is_mode_end: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<Seq>,
    pub acts: Vec<ActDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateDto {
    pub start_snap: String,
    pub after_snap: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub checkpoint: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResponseDto {
    pub game_name: String,
    pub game_id: u32,
    pub total_win: Credits,
    pub bet: Credits,
    pub bet_mode: usize,
    pub bet_mult: Credits,
    pub mode_results: Vec<ModeResultDto>,
    pub is_game_end: bool,
    pub state: StateDto,
}

impl From<&SpinOutcome> for SpinResponseDto {
    fn from(outcome: &SpinOutcome) -> Self {
        Self {
            game_name: outcome.game_name.clone(),
            game_id: outcome.game_id,
            total_win: outcome.total_win,
            bet: outcome.bet,
            bet_mode: outcome.bet_mode,
            bet_mult: outcome.bet_mult,
            mode_results: outcome.modes.iter().map(mode_result_dto).collect(),
            is_game_end: outcome.is_game_end,
            state: StateDto {
                start_snap: encode_snapshot(&outcome.start_snap),
                after_snap: encode_snapshot(&outcome.after_snap),
                checkpoint: outcome.checkpoint.clone(),
            },
        }
    }
}

fn mode_result_dto(mode: &ModeOutcome) -> ModeResultDto {
    let result = &mode.result;
    ModeResultDto {
        total_win: result.total_win,
        mode_id: mode.mode_id,
        is_mode_end: result.is_mode_end,
        trigger: result.trigger,
        acts: result.acts().iter().map(|act| act_dto(act, result)).collect(),
    }
}

fn act_dto(act: &problab_result::Act, result: &problab_result::GameModeResult) -> ActDto {
    let details = result.details()[act.details_start as usize..act.details_end as usize]
        .iter()
        .map(|detail| detail_dto(detail, result))
        .collect();
    let board = act.screen_start.map(|start| result.screen_at(start).to_vec());
    ActDto {
        act_type: act.act_type,
        round_id: act.round_id,
        step_id: act.step_id,
        act_id: act.act_id,
        is_round_end: act.is_round_end,
        is_step_end: act.is_step_end,
        win: act.win,
        acc_total_win: act.acc_total_win,
        acc_round_win: act.acc_round_win,
        acc_step_win: act.acc_step_win,
        board,
        details,
        ext: act.extension.clone(),
    }
}

fn detail_dto(detail: &problab_result::Detail, result: &problab_result::GameModeResult) -> DetailDto {
    let start = detail.hits_start as usize;
    let end = start + detail.hits_length as usize;
    DetailDto {
        win: detail.win,
        symbol: detail.symbol,
        line_id: detail.line_id,
        count: detail.count,
        combinations: detail.combinations,
        direction: detail.direction,
        hits: result.hits()[start..end].to_vec(),
    }
}
