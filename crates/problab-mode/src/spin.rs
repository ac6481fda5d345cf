use problab_core::{Credits, Seq};

/// One mode buffer a `GameLogic` finished with during this spin, identified
/// by which mode it came from and its pool slot. `Machine` resolves these
/// to owned `GameModeResult` clones when it assembles the response — the
/// pool slot itself is reused on the next spin.
#[derive(Debug, Clone, Copy)]
pub struct YieldedMode {
    pub mode_id: Seq,
    pub pid: usize,
}

/// Scratch the `GameLogic` populates during one `Machine::spin` call.
/// `Machine` owns this buffer, resets it before each call, and fills in
/// `start_snap`/`after_snap`/`checkpoint` itself once the logic returns —
/// those three are not the logic's to set.
#[derive(Debug, Clone, Default)]
pub struct SpinResult {
    pub total_win: Credits,
    pub is_game_end: bool,
    pub yielded: Vec<YieldedMode>,
    pub checkpoint: serde_json::Value,
    pub start_snap: Vec<u8>,
    pub after_snap: Vec<u8>,
}

impl SpinResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `mode_id`'s buffer at pool index `pid` is finished and
    /// should be included in the response, in yield order.
    pub fn record_yield(&mut self, mode_id: Seq, pid: usize) {
        self.yielded.push(YieldedMode { mode_id, pid });
    }

    /// Clears everything ahead of the next spin. Leaves `yielded`'s backing
    /// capacity in place.
    pub fn reset(&mut self) {
        self.total_win = 0;
        self.is_game_end = false;
        self.yielded.truncate(0);
        self.checkpoint = serde_json::Value::Null;
        self.start_snap.clear();
        self.after_snap.clear();
    }
}
