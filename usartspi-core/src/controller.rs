//! Lifecycle controller
//!
//! Ties the configurator, the message bracket and the transfer engine into
//! the operations a bus framework drives: per-peer setup and cleanup,
//! message preparation, single transfers, and suspend/resume.
//!
//! # Usage
//!
//! ```ignore
//! let spi = UsartSpi::attach(regs, clock, pins, irq, ControllerConfig::default())?;
//!
//! // Interrupt vector for the USART line:
//! spi.on_interrupt();
//!
//! // Polling context:
//! let mut peer = Peer::new(0).with_mode(Mode::Mode3);
//! spi.setup(&mut peer)?;
//! spi.transfer_message(&peer, &mut message)?;
//! ```

use core::convert::Infallible;

use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use usartspi_hal::{ClockSource, IrqReturn, MessageQueue, PinStates, Register, RegisterBank};

use crate::bracket;
use crate::config::{brgr_divider, ControllerConfig, PeerConfig, SpeedBounds, WORD_BITS};
use crate::error::{AttachError, PowerError, SetupError, TransferError};
use crate::peer::Peer;
use crate::transfer::{Engine, Failure, Message, Phase, Transfer};

/// Receive window used when none is given
pub const DEFAULT_WINDOW: usize = 32;

/// What the controller can do, for the framework to check peers against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    /// The only supported word width
    pub word_bits: u8,
    /// Clock polarity is configurable
    pub cpol: bool,
    /// Clock phase is configurable
    pub cpha: bool,
    /// Internal loopback is available
    pub loopback: bool,
    /// Active-high chip select is honoured
    pub cs_active_high: bool,
    /// Every transfer needs a transmit buffer
    pub must_tx: bool,
    /// Every transfer needs a receive buffer
    pub must_rx: bool,
}

/// Capabilities of a USART in SPI master mode
pub const CAPABILITIES: Capabilities = Capabilities {
    word_bits: WORD_BITS,
    cpol: true,
    cpha: true,
    loopback: true,
    cs_active_high: true,
    must_tx: true,
    must_rx: true,
};

/// Power state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Clock running
    Active,
    /// Clock gated by runtime power management
    RuntimeSuspended,
    /// Clock gated by a system suspend
    Suspended,
}

/// USART operated as an SPI master
///
/// Shared by reference between the polling context (transfers) and the
/// interrupt context ([`on_interrupt`](Self::on_interrupt)). `M` picks the
/// lock both contexts serialize on; `W` is the receive window in bytes.
pub struct UsartSpi<R, C, P, M = CriticalSectionRawMutex, const W: usize = DEFAULT_WINDOW>
where
    M: RawMutex,
{
    regs: R,
    clock: C,
    pins: P,
    irq: u32,
    base_clock_hz: u32,
    bounds: SpeedBounds,
    config: ControllerConfig,
    engine: Engine<M, W>,
    power: PowerState,
}

impl<R, C, P, M, const W: usize> UsartSpi<R, C, P, M, W>
where
    R: RegisterBank,
    C: ClockSource,
    P: PinStates,
    M: RawMutex,
{
    const WINDOW_NONZERO: () = assert!(W > 0, "receive window must hold at least one byte");

    /// Bring the peripheral up
    ///
    /// Enables the clock, samples its rate for the advertised speed range
    /// and writes the baseline mode. If the clock cannot be enabled nothing
    /// stays acquired. The caller routes interrupt line `irq` to
    /// [`on_interrupt`](Self::on_interrupt).
    pub fn attach(
        regs: R,
        mut clock: C,
        pins: P,
        irq: u32,
        config: ControllerConfig,
    ) -> Result<Self, AttachError> {
        #[allow(clippy::let_unit_value)]
        let () = Self::WINDOW_NONZERO;

        clock.enable().map_err(|_| AttachError::ClockUnavailable)?;
        let base_clock_hz = clock.rate_hz();

        bracket::init(&regs);

        #[cfg(feature = "defmt")]
        defmt::info!(
            "USART SPI controller version {=u32:#x}, {=u32} Hz (irq {=u32})",
            regs.read32(Register::Version),
            base_clock_hz,
            irq
        );

        Ok(Self {
            regs,
            clock,
            pins,
            irq,
            base_clock_hz,
            bounds: SpeedBounds::for_clock(base_clock_hz),
            config,
            engine: Engine::new(),
            power: PowerState::Active,
        })
    }

    /// Shut the peripheral down and hand back its collaborators
    pub fn detach(mut self) -> (R, C, P) {
        if self.power == PowerState::Active {
            self.clock.disable();
        }
        (self.regs, self.clock, self.pins)
    }

    /// Advertised speed range
    pub fn bounds(&self) -> SpeedBounds {
        self.bounds
    }

    /// Fastest supported bit clock
    pub fn max_speed_hz(&self) -> u32 {
        self.bounds.max_speed_hz
    }

    /// Slowest supported bit clock
    pub fn min_speed_hz(&self) -> u32 {
        self.bounds.min_speed_hz
    }

    /// Peripheral clock sampled at attach
    pub fn base_clock_hz(&self) -> u32 {
        self.base_clock_hz
    }

    /// Interrupt line this controller services
    pub fn irq(&self) -> u32 {
        self.irq
    }

    /// IP version register
    pub fn version(&self) -> u32 {
        self.regs.read32(Register::Version)
    }

    /// Status register as of the last read by either context
    pub fn last_status(&self) -> u32 {
        self.engine.last_status()
    }

    /// Phase of the current transfer
    pub fn phase(&self) -> Phase {
        self.engine.phase()
    }

    /// Current power state
    pub fn power_state(&self) -> PowerState {
        self.power
    }

    /// Register bank
    pub fn regs(&self) -> &R {
        &self.regs
    }

    /// Validate a peer and cache its mode register
    ///
    /// On failure the peer is left without controller state.
    pub fn setup(&self, peer: &mut Peer) -> Result<(), SetupError> {
        let current = self.regs.read32(Register::Mode);

        match PeerConfig::compute(current, &peer.mode, peer.bits_per_word) {
            Ok(config) => {
                #[cfg(feature = "defmt")]
                defmt::debug!(
                    "setup: bpw {=u8} cs {=u8} -> mr {=u32:#010x}",
                    peer.bits_per_word,
                    peer.chip_select,
                    config.mode_register
                );
                peer.install(config);
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Only 8 bits per word are supported");
                peer.release();
                Err(e)
            }
        }
    }

    /// Drop a peer's controller state
    pub fn cleanup(&self, peer: &mut Peer) {
        peer.release();
    }

    /// Arm the peripheral for a message to `peer`
    pub fn prepare_message(&self, peer: &Peer) -> Result<(), TransferError> {
        let config = peer.config().ok_or(TransferError::PeerNotConfigured)?;
        bracket::arm(&self.regs, config.mode_register);
        Ok(())
    }

    /// Disarm the peripheral after a message
    pub fn unprepare_message(&self, _peer: &Peer) -> Result<(), Infallible> {
        bracket::disarm(&self.regs);
        Ok(())
    }

    /// Run one transfer between a prepare/unprepare pair
    ///
    /// Programs the divider for `xfer.speed_hz` as given; resolving a zero
    /// or out-of-range speed is the framework's job (see
    /// [`transfer_message`](Self::transfer_message)). On failure the
    /// receive buffer holds the bytes received before the failure and is
    /// otherwise untouched.
    pub fn transfer_one(&self, _peer: &Peer, xfer: &mut Transfer<'_>) -> Result<(), TransferError> {
        if xfer.tx.len() != xfer.rx.len() {
            return Err(TransferError::LengthMismatch);
        }

        let div = brgr_divider(self.base_clock_hz, xfer.speed_hz);
        #[cfg(feature = "defmt")]
        {
            let wanted = crate::config::divider(self.base_clock_hz, xfer.speed_hz);
            if wanted != div {
                defmt::warn!("{=u32} Hz needs divider {=u32}, saturated", xfer.speed_hz, wanted);
            }
        }
        self.regs.write32(Register::BaudRateGenerator, div);

        let len = xfer.len();
        let mut offset = 0;
        while offset < len {
            let end = (offset + W).min(len);
            self.engine
                .arm(end - offset)
                .map_err(|_| TransferError::Busy)?;

            let outcome = self.engine.run(
                &self.regs,
                &xfer.tx[offset..end],
                &mut xfer.rx[offset..end],
                &self.config.poll,
            );
            if let Err(why) = outcome {
                log_failure(why);
                return Err(why.into());
            }
            offset = end;
        }

        Ok(())
    }

    /// Speed a transfer actually runs at
    ///
    /// Zero means the peer's maximum (or the controller's if the peer has
    /// none); the result is clamped to the advertised range.
    pub fn resolve_speed(&self, peer: &Peer, speed_hz: u32) -> u32 {
        let requested = match (speed_hz, peer.max_speed_hz) {
            (0, 0) => self.bounds.max_speed_hz,
            (0, peer_max) => peer_max,
            (hz, 0) => hz,
            (hz, peer_max) => hz.min(peer_max),
        };
        self.bounds.clamp(requested)
    }

    /// Run every transfer of a message under one bracket
    ///
    /// Stops at the first failing transfer. The peripheral is disarmed
    /// whether or not the message succeeded.
    pub fn transfer_message<const N: usize>(
        &self,
        peer: &Peer,
        msg: &mut Message<'_, N>,
    ) -> Result<(), TransferError> {
        msg.actual_length = 0;
        self.prepare_message(peer)?;

        let mut outcome = Ok(());
        let mut exchanged = 0;
        for xfer in msg.transfers_mut() {
            xfer.speed_hz = self.resolve_speed(peer, xfer.speed_hz);
            outcome = self.transfer_one(peer, xfer);
            if outcome.is_err() {
                break;
            }
            exchanged += xfer.len();
        }
        msg.actual_length = exchanged;

        self.unprepare_message(peer).unwrap_or_else(|never| match never {});
        outcome
    }

    /// Interrupt handler for the controller's line
    pub fn on_interrupt(&self) -> IrqReturn {
        self.engine.on_interrupt(&self.regs)
    }

    /// Gate the clock and park the pins
    ///
    /// Only acts while `Active`; a controller already gated by either
    /// kind of suspend is left as it is.
    pub fn runtime_suspend(&mut self) {
        if self.power == PowerState::Active {
            self.gate();
            self.power = PowerState::RuntimeSuspended;
        }
    }

    /// Restore the pins and the clock
    ///
    /// Only acts while `RuntimeSuspended`; a system suspend is undone by
    /// [`resume`](Self::resume) alone.
    pub fn runtime_resume(&mut self) -> Result<(), PowerError> {
        if self.power == PowerState::RuntimeSuspended {
            self.ungate()?;
            self.power = PowerState::Active;
        }
        Ok(())
    }

    /// System suspend
    ///
    /// Stops the framework's queue, then gates the clock unless runtime
    /// power management already did.
    pub fn suspend<Q: MessageQueue>(&mut self, queue: &mut Q) -> Result<(), PowerError> {
        queue.quiesce().map_err(|_| PowerError::Queue)?;

        if self.power == PowerState::Active {
            self.gate();
            self.power = PowerState::Suspended;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!("suspended ({})", self.power);
        Ok(())
    }

    /// System resume
    ///
    /// Ungates the clock if suspend gated it, re-initializes the
    /// peripheral and restarts the queue.
    pub fn resume<Q: MessageQueue>(&mut self, queue: &mut Q) -> Result<(), PowerError> {
        if self.power == PowerState::Suspended {
            self.ungate()?;
            self.power = PowerState::Active;
        }

        bracket::init(&self.regs);

        #[cfg(feature = "defmt")]
        defmt::debug!("resumed ({})", self.power);
        queue.restart().map_err(|_| PowerError::Queue)
    }

    fn gate(&mut self) {
        self.clock.disable();
        self.pins.select_sleep();
    }

    fn ungate(&mut self) -> Result<(), PowerError> {
        self.pins.select_default();
        self.clock.enable().map_err(|_| PowerError::Clock)
    }
}

#[cfg(feature = "defmt")]
fn log_failure(why: Failure) {
    match why {
        Failure::Overrun => defmt::error!("Overrun!"),
        Failure::Stalled => defmt::warn!("Transfer stalled"),
    }
}

#[cfg(not(feature = "defmt"))]
fn log_failure(_why: Failure) {}
