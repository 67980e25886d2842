/// Holds at most one pending timer handle. Handles cancel on drop (as
/// `gloo_timers::callback::Timeout` does), so replacing or clearing the
/// slot cancels whatever was pending.
pub struct TimerSlot<H> {
    pending: Option<(u64, H)>,
}

impl<H> Default for TimerSlot<H> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<H> TimerSlot<H> {
    /// Arms `handle` for send `seq`, cancelling any earlier timer.
    pub fn arm(&mut self, seq: u64, handle: H) {
        self.pending = Some((seq, handle));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Sequence number of the pending timer, if any.
    pub fn armed_for(&self) -> Option<u64> {
        self.pending.as_ref().map(|(seq, _)| *seq)
    }
}
