//! Mode register computation
//!
//! Folds a peer's clock polarity, clock phase and loopback attributes into
//! the USART mode register. The character length field is left at the one
//! encoding the engine supports.

use usartspi_hal::{Phase, Polarity, SpiMode};

use crate::error::SetupError;
use crate::regs::mr;

/// The only word width the engine transfers
pub const WORD_BITS: u8 = 8;

/// Per-peer hardware state cached between messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerConfig {
    /// Mode register value written verbatim when a message to the peer starts
    pub mode_register: u32,
}

impl PeerConfig {
    /// Derive the peer's mode register from the current one
    ///
    /// Fails with [`SetupError::UnsupportedWordWidth`] for anything but
    /// 8-bit words.
    pub fn compute(current: u32, mode: &SpiMode, bits_per_word: u8) -> Result<Self, SetupError> {
        if bits_per_word != WORD_BITS {
            return Err(SetupError::UnsupportedWordWidth(bits_per_word));
        }

        Ok(Self {
            mode_register: mode_register(current, mode),
        })
    }
}

/// Set or clear the CPOL, CPHA and LOOP bits of `current`
pub fn mode_register(current: u32, mode: &SpiMode) -> u32 {
    let mut value = current | mr::CHRL_8;
    value = assign(value, mr::CPOL, mode.polarity == Polarity::IdleHigh);
    value = assign(value, mr::CPHA, mode.phase == Phase::CaptureOnSecondTransition);
    assign(value, mr::LOOP, mode.loopback)
}

fn assign(value: u32, bit: u32, set: bool) -> u32 {
    if set {
        value | bit
    } else {
        value & !bit
    }
}
