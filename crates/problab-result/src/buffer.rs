use crate::act::{Act, Finish};
use crate::detail::{Detail, Direction};
use problab_core::{CellIndex, Combinations, Count, Credits, ProblabError, Seq, SymbolId};
use serde::Serialize;

/// Staging cursors for the act currently being assembled. Everything here
/// is scratch: it is folded into a committed [`Act`] by `add_act`, or
/// unwound by `discard`.
#[derive(Debug, Clone, Copy, Default)]
struct Tmp {
    current_round: Seq,
    current_step: Seq,
    current_act: Seq,
    screen_start: usize,
    detail_start: usize,
    hits_start: usize,
    acc_total_win: Credits,
    round_acc_win: Credits,
    step_acc_win: Credits,
    win: Credits,
}

/// The per-mode spin accumulator: "what this spin-attempt has produced so
/// far." Owns flat arenas for screens, details, and hit cell indices, plus
/// a sequence of committed [`Act`]s. All arenas grow by `push`/`truncate`
/// so backing capacity survives a `reset`.
///
/// Serializes directly into the wire "mode result" shape: flat `screens`/
/// `hits` arenas plus index-based `acts`/`details` avoid duplicating board
/// and cell data per act. `tmp` is in-progress scratch and never reaches
/// the wire.
#[derive(Debug, Clone, Serialize)]
pub struct GameModeResult {
    pub total_win: Credits,
    pub game_mode_id: Seq,
    pub is_mode_end: bool,
    pub trigger: Option<Seq>,
    acts: Vec<Act>,
    screens: Vec<SymbolId>,
    screen_size: usize,
    details: Vec<Detail>,
    hits: Vec<CellIndex>,
    #[serde(skip)]
    tmp: Tmp,
}

impl GameModeResult {
    /// `screen_size` is the board's `columns * rows`, fixed for the mode's
    /// lifetime. `est_details`/`est_hits` size the initial allocation; both
    /// arenas grow past them if a spin needs more (a cold path).
    pub fn new(game_mode_id: Seq, screen_size: usize, est_details: usize, est_hits: usize) -> Self {
        Self {
            total_win: 0,
            game_mode_id,
            is_mode_end: false,
            trigger: None,
            acts: Vec::with_capacity(est_details.min(64)),
            screens: Vec::new(),
            screen_size,
            details: Vec::with_capacity(est_details),
            hits: Vec::with_capacity(est_hits),
            tmp: Tmp::default(),
        }
    }

    /// Appends one Detail and its hit cells, and bumps the in-progress
    /// act's win (and the running `acc_total_win`/`round_acc_win`/
    /// `step_acc_win`, which track the sum of committed acts plus the
    /// current in-progress one).
    pub fn record_detail(
        &mut self,
        win: Credits,
        symbol: SymbolId,
        line_id: Option<u32>,
        count: Count,
        combinations: Combinations,
        direction: Direction,
        hits: &[CellIndex],
    ) {
        let hits_start = self.hits.len() as u32;
        self.hits.extend_from_slice(hits);
        self.details.push(Detail {
            win,
            symbol,
            line_id,
            count,
            combinations,
            direction,
            hits_start,
            hits_length: hits.len() as u32,
        });
        self.bump_tmp_win(win);
    }

    /// Same as `record_detail` but for the Way calculator's two-segment hit
    /// lists (self-symbol occurrences, then wild occurrences).
    #[allow(clippy::too_many_arguments)]
    pub fn record_detail_segments(
        &mut self,
        win: Credits,
        symbol: SymbolId,
        line_id: Option<u32>,
        count: Count,
        combinations: Combinations,
        direction: Direction,
        seg1: &[CellIndex],
        seg2: &[CellIndex],
    ) {
        let hits_start = self.hits.len() as u32;
        self.hits.extend_from_slice(seg1);
        self.hits.extend_from_slice(seg2);
        self.details.push(Detail {
            win,
            symbol,
            line_id,
            count,
            combinations,
            direction,
            hits_start,
            hits_length: (seg1.len() + seg2.len()) as u32,
        });
        self.bump_tmp_win(win);
    }

    fn bump_tmp_win(&mut self, delta: Credits) {
        self.tmp.win += delta;
        self.tmp.acc_total_win += delta;
        self.tmp.round_acc_win += delta;
        self.tmp.step_acc_win += delta;
    }

    pub fn get_tmp_win(&self) -> Credits {
        self.tmp.win
    }

    /// Overwrites the in-progress act's win, adjusting the running
    /// cumulative fields by the delta rather than recomputing them.
    pub fn update_tmp_win(&mut self, new_win: Credits) {
        let delta = new_win - self.tmp.win;
        self.tmp.win = new_win;
        self.tmp.acc_total_win += delta;
        self.tmp.round_acc_win += delta;
        self.tmp.step_acc_win += delta;
    }

    /// The most recently snapshotted board, or `None` if no act has
    /// captured one yet.
    pub fn view(&self) -> Option<&[SymbolId]> {
        if self.screens.is_empty() {
            None
        } else {
            Some(&self.screens[self.screens.len() - self.screen_size..])
        }
    }

    /// Concatenated hit cells of the most recently committed Act.
    pub fn hit_map_last_act(&self) -> Vec<CellIndex> {
        match self.acts.last() {
            Some(act) => self.hit_map_details(act.details_start, act.details_end),
            None => Vec::new(),
        }
    }

    /// Concatenated hit cells accumulated since the last commit.
    pub fn hit_map_tmp(&self) -> Vec<CellIndex> {
        self.hit_map_details(self.tmp.detail_start as u32, self.details.len() as u32)
    }

    fn hit_map_details(&self, start: u32, end: u32) -> Vec<CellIndex> {
        let mut out = Vec::new();
        for detail in &self.details[start as usize..end as usize] {
            let s = detail.hits_start as usize;
            let e = s + detail.hits_length as usize;
            out.extend_from_slice(&self.hits[s..e]);
        }
        out
    }

    /// Rolls back the in-progress act: truncates every arena to where it
    /// stood at the last commit, and subtracts the discarded win from the
    /// running cumulative fields.
    pub fn discard(&mut self) {
        self.details.truncate(self.tmp.detail_start);
        self.hits.truncate(self.tmp.hits_start);
        self.screens.truncate(self.tmp.screen_start);
        self.tmp.acc_total_win -= self.tmp.win;
        self.tmp.round_acc_win -= self.tmp.win;
        self.tmp.step_acc_win -= self.tmp.win;
        self.tmp.win = 0;
    }

    /// Commits the in-progress act. `screen`, if non-empty, must equal
    /// `screen_size` and is appended to the screens arena as this act's
    /// snapshot.
    pub fn add_act(
        &mut self,
        finish: Finish,
        act_type: problab_core::ActTag,
        screen: &[SymbolId],
        extension: serde_json::Value,
    ) -> Result<(), ProblabError> {
        let screen_start = if screen.is_empty() {
            None
        } else {
            if screen.len() != self.screen_size {
                return Err(ProblabError::ProgrammerError(format!(
                    "add_act screen length {} != screen_size {}",
                    screen.len(),
                    self.screen_size
                )));
            }
            let start = self.screens.len() as u32;
            self.screens.extend_from_slice(screen);
            Some(start)
        };

        let act = Act {
            act_type,
            round_id: self.tmp.current_round,
            step_id: self.tmp.current_step,
            act_id: self.tmp.current_act,
            is_round_end: matches!(finish, Finish::Round),
            is_step_end: matches!(finish, Finish::Step | Finish::Round),
            win: self.tmp.win,
            acc_total_win: self.tmp.acc_total_win,
            acc_round_win: self.tmp.round_acc_win,
            acc_step_win: self.tmp.step_acc_win,
            details_start: self.tmp.detail_start as u32,
            details_end: self.details.len() as u32,
            screen_start,
            extension,
        };
        self.total_win += self.tmp.win;
        self.acts.push(act);

        self.tmp.current_act += 1;
        self.tmp.detail_start = self.details.len();
        self.tmp.hits_start = self.hits.len();
        self.tmp.screen_start = self.screens.len();
        self.tmp.win = 0;

        match finish {
            Finish::Act => {}
            Finish::Step => {
                self.tmp.current_step += 1;
                self.tmp.step_acc_win = 0;
            }
            Finish::Round => {
                self.tmp.current_round += 1;
                self.tmp.current_step = 0;
                self.tmp.round_acc_win = 0;
                self.tmp.step_acc_win = 0;
            }
        }
        Ok(())
    }

    /// Retroactively marks the last committed Act as ending a step.
    /// No-op if it already does, or if nothing has been committed yet.
    pub fn finish_step(&mut self) {
        if let Some(act) = self.acts.last_mut() {
            act.is_step_end = true;
        }
    }

    /// Retroactively marks the last committed Act as ending a round (which
    /// implies ending its step).
    pub fn finish_round(&mut self) {
        if let Some(act) = self.acts.last_mut() {
            act.is_step_end = true;
            act.is_round_end = true;
        }
    }

    /// Zeroes logical lengths and cursors; backing capacity is preserved.
    pub fn reset(&mut self) {
        self.total_win = 0;
        self.is_mode_end = false;
        self.trigger = None;
        self.acts.truncate(0);
        self.screens.truncate(0);
        self.details.truncate(0);
        self.hits.truncate(0);
        self.tmp = Tmp::default();
    }

    /// The board snapshot an act recorded, given its `screen_start`. Used
    /// by callers converting committed acts to an outward-facing shape.
    pub fn screen_at(&self, screen_start: u32) -> &[SymbolId] {
        let start = screen_start as usize;
        &self.screens[start..start + self.screen_size]
    }

    pub fn acts(&self) -> &[Act] {
        &self.acts
    }

    pub fn details(&self) -> &[Detail] {
        &self.details
    }

    pub fn hits(&self) -> &[CellIndex] {
        &self.hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn buf() -> GameModeResult {
        GameModeResult::new(0, 9, 8, 16)
    }

    #[test]
    fn record_detail_bumps_tmp_win_and_cumulative_fields() {
        let mut b = buf();
        b.record_detail(10, 1, Some(0), 3, 1, Direction::Ltr, &[0, 1, 2]);
        assert_eq!(b.get_tmp_win(), 10);
        assert_eq!(b.hit_map_tmp(), vec![0, 1, 2]);
    }

    #[test]
    fn discard_rolls_back_all_arenas_and_win() {
        let mut b = buf();
        b.record_detail(10, 1, Some(0), 3, 1, Direction::Ltr, &[0, 1, 2]);
        b.discard();
        assert_eq!(b.get_tmp_win(), 0);
        assert!(b.details().is_empty());
        assert!(b.hits().is_empty());
    }

    #[test]
    fn add_act_commits_and_resets_tmp_win() {
        let mut b = buf();
        b.record_detail(10, 1, Some(0), 3, 1, Direction::Ltr, &[0, 1, 2]);
        b.add_act(Finish::Act, 0, &[], Value::Null).unwrap();
        assert_eq!(b.total_win, 10);
        assert_eq!(b.get_tmp_win(), 0);
        assert_eq!(b.acts().len(), 1);
        assert_eq!(b.hit_map_last_act(), vec![0, 1, 2]);
    }

    #[test]
    fn add_act_rejects_wrong_screen_length() {
        let mut b = buf();
        let result = b.add_act(Finish::Act, 0, &[1, 2, 3], Value::Null);
        assert!(result.is_err());
    }

    #[test]
    fn add_act_with_screen_populates_view() {
        let mut b = buf();
        let screen = vec![1u16; 9];
        b.add_act(Finish::Act, 0, &screen, Value::Null).unwrap();
        assert_eq!(b.view(), Some(screen.as_slice()));
    }

    #[test]
    fn finish_step_marks_last_act_idempotently() {
        let mut b = buf();
        b.add_act(Finish::Act, 0, &[], Value::Null).unwrap();
        b.finish_step();
        b.finish_step();
        assert!(b.acts()[0].is_step_end);
    }

    #[test]
    fn round_commit_resets_round_and_step_accumulators() {
        let mut b = buf();
        b.record_detail(5, 1, None, 1, 1, Direction::None, &[]);
        b.add_act(Finish::Round, 0, &[], Value::Null).unwrap();
        b.record_detail(7, 2, None, 1, 1, Direction::None, &[]);
        assert_eq!(b.get_tmp_win(), 7);
        assert_eq!(b.acts()[0].acc_round_win, 5);
    }

    #[test]
    fn reset_zeros_everything_but_preserves_capacity() {
        let mut b = buf();
        b.record_detail(10, 1, Some(0), 3, 1, Direction::Ltr, &[0, 1, 2]);
        b.add_act(Finish::Round, 0, &[1u16; 9], Value::Null).unwrap();
        let cap_before = b.details.capacity();
        b.reset();
        assert_eq!(b.total_win, 0);
        assert!(b.acts().is_empty());
        assert!(b.view().is_none());
        assert_eq!(b.details.capacity(), cap_before);
    }

    #[test]
    fn acc_total_win_equals_committed_plus_tmp_invariant() {
        let mut b = buf();
        b.record_detail(4, 1, None, 1, 1, Direction::None, &[]);
        b.add_act(Finish::Act, 0, &[], Value::Null).unwrap();
        b.record_detail(6, 2, None, 1, 1, Direction::None, &[]);
        let committed: i64 = b.acts().iter().map(|a| a.win).sum();
        assert_eq!(committed + b.get_tmp_win(), b.tmp.acc_total_win);
    }
}
