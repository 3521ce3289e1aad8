//! Error types for controller operations

use core::fmt;

use crate::transfer::Failure;

/// Peer setup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    /// Requested bits per word; only 8 is supported
    UnsupportedWordWidth(u8),
}

/// Transfer failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferError {
    /// Receive overrun; buffer contents past the received prefix are stale
    Overrun,
    /// Spin limit reached without the peripheral making progress
    Stalled,
    /// Transmit and receive buffers differ in length
    LengthMismatch,
    /// Message addressed to a peer that was never set up
    PeerNotConfigured,
    /// Another transfer is in flight on this controller
    Busy,
}

/// Failures bringing a controller up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AttachError {
    /// Peripheral clock could not be enabled
    ClockUnavailable,
}

/// Failures around suspend/resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerError {
    /// Peripheral clock could not be re-enabled
    Clock,
    /// Message queue refused to stop or restart
    Queue,
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::UnsupportedWordWidth(bits) => {
                write!(f, "Only 8 bits per word are supported, got {}", bits)
            }
        }
    }
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Overrun => write!(f, "Receive overrun"),
            TransferError::Stalled => write!(f, "Peripheral stalled"),
            TransferError::LengthMismatch => write!(f, "Buffer length mismatch"),
            TransferError::PeerNotConfigured => write!(f, "Peer not configured"),
            TransferError::Busy => write!(f, "Transfer already in flight"),
        }
    }
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachError::ClockUnavailable => write!(f, "Peripheral clock unavailable"),
        }
    }
}

impl fmt::Display for PowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PowerError::Clock => write!(f, "Clock enable failed"),
            PowerError::Queue => write!(f, "Message queue state change failed"),
        }
    }
}

impl From<Failure> for TransferError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Overrun => TransferError::Overrun,
            Failure::Stalled => TransferError::Stalled,
        }
    }
}

impl embedded_hal::spi::Error for TransferError {
    fn kind(&self) -> embedded_hal::spi::ErrorKind {
        match self {
            TransferError::Overrun => embedded_hal::spi::ErrorKind::Overrun,
            _ => embedded_hal::spi::ErrorKind::Other,
        }
    }
}
