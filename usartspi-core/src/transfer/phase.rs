//! Transfer lifecycle
//!
//! One transfer moves `Idle → Armed → Running → {Complete | Failed} → Idle`.
//! The phase is kept next to the cursor under the controller lock.

/// Phases of a single transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// No transfer installed; the cursor must not be read
    #[default]
    Idle,
    /// Cursor installed, counters reset
    Armed,
    /// Polling loop active, interrupt context draining RX
    Running,
    /// Both counters reached zero
    Complete,
    /// Transfer abandoned
    Failed(Failure),
}

/// Why a transfer was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Failure {
    /// Interrupt context saw OVRE
    Overrun,
    /// Polling context gave up waiting
    Stalled,
}

/// Events that move a transfer between phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// transfer-one installed a cursor
    Arm,
    /// Polling loop started
    Start,
    /// Both counters drained with no failure flagged
    Drained,
    /// Failure flagged
    Abort(Failure),
    /// transfer-one returned
    Finish,
}

impl Phase {
    /// Check if a cursor is live
    pub fn is_live(&self) -> bool {
        matches!(self, Phase::Armed | Phase::Running)
    }

    /// Process an event and return the next phase
    ///
    /// Events that do not apply leave the phase unchanged, so arming while
    /// `Running` is a no-op.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;

        match (self, event) {
            (Phase::Idle, Arm) => Phase::Armed,
            (Phase::Armed, Start) => Phase::Running,
            (Phase::Armed, Abort(why)) => Phase::Failed(why),
            (Phase::Running, Drained) => Phase::Complete,
            (Phase::Running, Abort(why)) => Phase::Failed(why),
            (Phase::Complete, Finish) | (Phase::Failed(_), Finish) => Phase::Idle,
            (state, _) => state,
        }
    }
}
