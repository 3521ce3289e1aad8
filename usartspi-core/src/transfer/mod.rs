//! Transfers and messages
//!
//! A transfer is one full-duplex exchange; a message is a run of
//! transfers to one peer under a single arm/disarm bracket.

pub mod cursor;
pub mod engine;
pub mod phase;

pub use cursor::Cursor;
pub use engine::{Busy, Engine, Step};
pub use phase::{Event, Failure, Phase};

use heapless::Vec;

/// One full-duplex exchange
///
/// The engine always transmits and always receives, so both buffers are
/// required and must be the same length.
#[derive(Debug)]
pub struct Transfer<'a> {
    /// Bit clock in Hz; 0 picks the peer's maximum
    pub speed_hz: u32,
    /// Bytes to send
    pub tx: &'a [u8],
    /// Bytes received, one per byte sent
    pub rx: &'a mut [u8],
}

impl<'a> Transfer<'a> {
    /// Create a transfer at the default speed
    pub fn new(tx: &'a [u8], rx: &'a mut [u8]) -> Self {
        Self { speed_hz: 0, tx, rx }
    }

    /// Set the bit clock
    #[must_use]
    pub fn with_speed(mut self, hz: u32) -> Self {
        self.speed_hz = hz;
        self
    }

    /// Number of bytes exchanged
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Check if the transfer moves no data
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Transfers sent to one peer as a unit
#[derive(Debug, Default)]
pub struct Message<'a, const N: usize> {
    transfers: Vec<Transfer<'a>, N>,
    /// Bytes exchanged by completed transfers
    pub actual_length: usize,
}

impl<'a, const N: usize> Message<'a, N> {
    /// Create an empty message
    pub fn new() -> Self {
        Self {
            transfers: Vec::new(),
            actual_length: 0,
        }
    }

    /// Append a transfer; hands it back if the message is full
    pub fn push(&mut self, transfer: Transfer<'a>) -> Result<(), Transfer<'a>> {
        self.transfers.push(transfer)
    }

    /// Transfers in order
    pub fn transfers(&self) -> &[Transfer<'a>] {
        &self.transfers
    }

    pub(crate) fn transfers_mut(&mut self) -> &mut [Transfer<'a>] {
        &mut self.transfers
    }
}
