//! Transfer engine for a USART running as an SPI master
//!
//! This crate drives byte-wide full-duplex transfers through the USART's
//! holding registers:
//!
//! - Clock divider and mode register computation
//! - Per-peer mode caching
//! - The transfer engine: a polling loop feeding TX and an interrupt
//!   handler draining RX, sharing one lock-protected cursor
//! - The arm/disarm bracket around messages and peripheral init
//! - Lifecycle operations (setup, transfer, suspend/resume)
//! - An `embedded-hal` [`SpiBus`](embedded_hal::spi::SpiBus) adapter
//!
//! Register access, clocks and pins come in through the `usartspi-hal`
//! traits, so everything here runs on the host under test.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bracket;
pub mod bus;
pub mod config;
pub mod controller;
pub mod error;
pub mod peer;
pub mod regs;
pub mod transfer;

#[cfg(test)]
mod sim;

pub use bus::UsartSpiBus;
pub use config::{ControllerConfig, PeerConfig, PollPolicy, SpeedBounds};
pub use controller::{Capabilities, PowerState, UsartSpi, CAPABILITIES};
pub use error::{AttachError, PowerError, SetupError, TransferError};
pub use peer::Peer;
pub use transfer::{Message, Transfer};
