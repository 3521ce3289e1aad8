//! Clock and mode configuration
//!
//! Translates transfer speeds and peer mode descriptors into hardware
//! register values, plus the controller-level knobs.

pub mod clock;
pub mod mode;

pub use clock::{brgr_divider, divider, SpeedBounds};
pub use mode::{mode_register, PeerConfig, WORD_BITS};

/// Busy-wait behavior of the polling context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollPolicy {
    /// Give up after this many consecutive spins without progress
    ///
    /// `None` waits forever, which is what the hardware handshake assumes:
    /// if the peripheral never raises TXRDY or RXRDY the caller blocks
    /// indefinitely. Hosted targets and tests should set a limit.
    pub spin_limit: Option<u32>,
}

impl PollPolicy {
    /// Wait forever
    pub const fn unbounded() -> Self {
        Self { spin_limit: None }
    }

    /// Abort after `spins` idle iterations
    pub const fn bounded(spins: u32) -> Self {
        Self {
            spin_limit: Some(spins),
        }
    }
}

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerConfig {
    /// Polling loop behavior
    pub poll: PollPolicy,
}
