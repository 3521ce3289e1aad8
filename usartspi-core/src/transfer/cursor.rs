//! Live transfer cursor
//!
//! Counts bytes still to transmit and still to receive for the window in
//! flight, and holds the bytes the interrupt context has received so far.
//! Both counters start at the window length and only go down.

use heapless::Vec;

/// Progress of the window in flight
#[derive(Debug, Clone)]
pub struct Cursor<const W: usize> {
    len: usize,
    tx_remaining: usize,
    rx_remaining: usize,
    failed: bool,
    /// Received bytes; `received[i]` is the reply to transmitted byte `i`
    received: Vec<u8, W>,
}

impl<const W: usize> Default for Cursor<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const W: usize> Cursor<W> {
    /// Create an empty cursor
    pub const fn new() -> Self {
        Self {
            len: 0,
            tx_remaining: 0,
            rx_remaining: 0,
            failed: false,
            received: Vec::new(),
        }
    }

    /// Reset for a window of `len` bytes (clamped to the capacity `W`)
    pub fn arm(&mut self, len: usize) {
        let len = len.min(W);
        self.len = len;
        self.tx_remaining = len;
        self.rx_remaining = len;
        self.failed = false;
        self.received.clear();
    }

    /// Bytes not yet written to the data-out register
    pub fn tx_remaining(&self) -> usize {
        self.tx_remaining
    }

    /// Bytes not yet read from the data-in register
    pub fn rx_remaining(&self) -> usize {
        self.rx_remaining
    }

    /// Check if the failure flag is set
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Set the failure flag
    pub fn fail(&mut self) {
        self.failed = true;
    }

    /// Check if both counters reached zero
    pub fn is_drained(&self) -> bool {
        self.tx_remaining == 0 && self.rx_remaining == 0
    }

    /// Index of the next byte to transmit, if any
    pub fn next_tx(&self) -> Option<usize> {
        (self.tx_remaining > 0).then(|| self.len - self.tx_remaining)
    }

    /// Record that the byte at [`next_tx`](Self::next_tx) was written
    pub fn note_sent(&mut self) {
        self.tx_remaining = self.tx_remaining.saturating_sub(1);
    }

    /// Store the next received byte at `len - rx_remaining`
    ///
    /// Returns `false` if nothing more is expected.
    pub fn accept(&mut self, byte: u8) -> bool {
        if self.rx_remaining == 0 {
            return false;
        }
        // Capacity is `W` and `len <= W`, so this cannot overflow
        if self.received.push(byte).is_err() {
            return false;
        }
        self.rx_remaining -= 1;
        true
    }

    /// Bytes received so far, in order
    pub fn received(&self) -> &[u8] {
        &self.received
    }
}
