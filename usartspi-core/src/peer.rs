//! Peer records
//!
//! A peer is one device on the bus, addressed by its chip select. The
//! controller caches the peer's mode register in the record on first
//! setup and drops it on cleanup.

use usartspi_hal::SpiMode;

use crate::config::{PeerConfig, WORD_BITS};

/// A logical device attached to the controller
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Peer {
    /// Chip select line
    pub chip_select: u8,
    /// Clocking attributes
    pub mode: SpiMode,
    /// Word width the peer asks for
    pub bits_per_word: u8,
    /// Fastest clock the peer accepts, 0 for no limit
    pub max_speed_hz: u32,
    /// Controller state, present once setup succeeded
    state: Option<PeerConfig>,
}

impl Peer {
    /// Create an unconfigured mode 0, 8-bit peer
    pub fn new(chip_select: u8) -> Self {
        Self {
            chip_select,
            mode: SpiMode::default(),
            bits_per_word: WORD_BITS,
            max_speed_hz: 0,
            state: None,
        }
    }

    /// Set clocking attributes
    #[must_use]
    pub fn with_mode(mut self, mode: impl Into<SpiMode>) -> Self {
        self.mode = mode.into();
        self
    }

    /// Set word width
    #[must_use]
    pub fn with_bits_per_word(mut self, bits: u8) -> Self {
        self.bits_per_word = bits;
        self
    }

    /// Set maximum clock
    #[must_use]
    pub fn with_max_speed(mut self, hz: u32) -> Self {
        self.max_speed_hz = hz;
        self
    }

    /// Cached controller state, if setup succeeded
    pub fn config(&self) -> Option<&PeerConfig> {
        self.state.as_ref()
    }

    /// Check if setup succeeded
    pub fn is_configured(&self) -> bool {
        self.state.is_some()
    }

    pub(crate) fn install(&mut self, config: PeerConfig) {
        // Reuse the slot if one exists; setup may run again after a mode change
        match self.state.as_mut() {
            Some(slot) => *slot = config,
            None => self.state = Some(config),
        }
    }

    pub(crate) fn release(&mut self) -> Option<PeerConfig> {
        self.state.take()
    }
}
