//! usartspi Hardware Abstraction Layer
//!
//! This crate defines the collaborator traits the transfer engine in
//! `usartspi-core` is written against. A target implements them once
//! (see `usartspi-hal-mmio`), tests implement them with simulators.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Bus framework / firmware               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  usartspi-core (transfer engine)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  usartspi-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ usartspi-hal- │       │   register    │
//! │     mmio      │       │   simulators  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`regs::RegisterBank`] - Named register access
//! - [`clock::ClockSource`] - Peripheral clock gate and rate
//! - [`power::PinStates`], [`power::MessageQueue`] - Suspend/resume hooks
//! - [`irq::IrqReturn`] - Interrupt attribution on shared lines

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod irq;
pub mod power;
pub mod regs;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use clock::ClockSource;
pub use irq::IrqReturn;
pub use power::{MessageQueue, PinStates};
pub use regs::{Register, RegisterBank};
pub use spi::{Mode, Phase, Polarity, SpiMode};
