//! Transfer engine
//!
//! The state both execution contexts share, and the two halves that touch
//! it: [`Engine::drive_step`] runs in the polling context and feeds the
//! data-out register, [`Engine::on_interrupt`] runs in the interrupt
//! context and drains the data-in register. Each call is exactly one
//! critical section on the controller lock; nothing spins while holding it.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use usartspi_hal::{IrqReturn, Register, RegisterBank};

use super::cursor::Cursor;
use super::phase::{Event, Failure, Phase};
use crate::config::PollPolicy;
use crate::regs::ir;

/// Result of one polling iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// A byte was written to the data-out register
    Sent,
    /// Nothing to do this time; `rx_remaining` lets the caller spot RX progress
    Waiting {
        /// Bytes the interrupt context has yet to receive
        rx_remaining: usize,
    },
    /// Window finished
    Done(Result<(), Failure>),
}

/// Attempt to arm while a cursor is live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Busy;

struct Shared<const W: usize> {
    phase: Phase,
    cursor: Cursor<W>,
    /// Last value read from the status register
    status: u32,
}

/// Lock-protected transfer state of one controller
pub struct Engine<M: RawMutex, const W: usize> {
    shared: Mutex<M, RefCell<Shared<W>>>,
}

impl<M: RawMutex, const W: usize> Default for Engine<M, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const W: usize> Engine<M, W> {
    /// Create an idle engine
    pub const fn new() -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                phase: Phase::Idle,
                cursor: Cursor::new(),
                status: 0,
            })),
        }
    }

    /// Current transfer phase
    pub fn phase(&self) -> Phase {
        self.shared.lock(|cell| cell.borrow().phase)
    }

    /// Status register value as of the most recent read by either context
    pub fn last_status(&self) -> u32 {
        self.shared.lock(|cell| cell.borrow().status)
    }

    /// `(tx_remaining, rx_remaining)` of the live cursor
    pub fn remaining(&self) -> (usize, usize) {
        self.shared.lock(|cell| {
            let shared = cell.borrow();
            (shared.cursor.tx_remaining(), shared.cursor.rx_remaining())
        })
    }

    /// Install a cursor for a window of `len` bytes (at most `W`)
    pub fn arm(&self, len: usize) -> Result<(), Busy> {
        self.shared.lock(|cell| {
            let mut shared = cell.borrow_mut();
            if shared.phase.is_live() {
                return Err(Busy);
            }
            shared.cursor.arm(len);
            // A finished transfer that was never collected is dropped here
            shared.phase = Phase::Idle.transition(Event::Arm);
            Ok(())
        })
    }

    /// One iteration of the polling loop
    ///
    /// Checks the loop condition, re-reads the status register and, if the
    /// transmitter is ready, writes the next byte of `tx` (the window being
    /// sent). Receive data is never read here.
    pub fn drive_step<R: RegisterBank>(&self, regs: &R, tx: &[u8]) -> Step {
        self.shared.lock(|cell| {
            let mut shared = cell.borrow_mut();
            let shared = &mut *shared;
            shared.phase = shared.phase.transition(Event::Start);

            if let Phase::Failed(why) = shared.phase {
                return Step::Done(Err(why));
            }
            if shared.cursor.failed() {
                shared.phase = shared.phase.transition(Event::Abort(Failure::Overrun));
                return Step::Done(Err(Failure::Overrun));
            }
            if shared.cursor.is_drained() {
                shared.phase = shared.phase.transition(Event::Drained);
                return Step::Done(Ok(()));
            }

            shared.status = regs.read32(Register::Status);
            if shared.status & ir::TXRDY != 0 {
                if let Some(index) = shared.cursor.next_tx() {
                    regs.write8(Register::TransmitData, tx.get(index).copied().unwrap_or(0));
                    shared.cursor.note_sent();
                    return Step::Sent;
                }
            }

            Step::Waiting {
                rx_remaining: shared.cursor.rx_remaining(),
            }
        })
    }

    /// Interrupt event handler
    ///
    /// Overrun is checked before receive-ready: a data-in register that
    /// overran holds undefined contents and is left unread.
    pub fn on_interrupt<R: RegisterBank>(&self, regs: &R) -> IrqReturn {
        self.shared.lock(|cell| {
            let mut shared = cell.borrow_mut();
            let shared = &mut *shared;
            shared.status = regs.read32(Register::Status);

            if shared.status & ir::OVRE != 0 {
                shared.cursor.fail();
                shared.phase = shared.phase.transition(Event::Abort(Failure::Overrun));
                regs.write32(Register::InterruptDisable, ir::OVRE_RXRDY);
                return IrqReturn::Handled;
            }

            if shared.status & ir::RXRDY != 0 {
                if shared.phase.is_live() && shared.cursor.rx_remaining() > 0 {
                    let byte = regs.read8(Register::ReceiveData);
                    shared.cursor.accept(byte);
                } else {
                    // No cursor to deliver to; read to clear RXRDY
                    let _ = regs.read8(Register::ReceiveData);
                }
                return IrqReturn::Handled;
            }

            IrqReturn::NotMine
        })
    }

    /// Abandon the live window from the polling side
    ///
    /// Mirrors the overrun path: sets the failure flag and silences the
    /// receive interrupts before the failure is reported.
    pub fn abort<R: RegisterBank>(&self, regs: &R, why: Failure) {
        self.shared.lock(|cell| {
            let mut shared = cell.borrow_mut();
            shared.cursor.fail();
            shared.phase = shared.phase.transition(Event::Abort(why));
            regs.write32(Register::InterruptDisable, ir::OVRE_RXRDY);
        })
    }

    /// Run an armed window to completion or failure
    ///
    /// Busy-waits in the calling context. The lock is taken once per
    /// iteration and released before spinning, so the interrupt context
    /// can always get in. With an unbounded [`PollPolicy`] this never
    /// returns if the peripheral stops raising TXRDY/RXRDY.
    pub fn run<R: RegisterBank>(
        &self,
        regs: &R,
        tx: &[u8],
        rx: &mut [u8],
        poll: &PollPolicy,
    ) -> Result<(), Failure> {
        let mut idle_spins: u32 = 0;
        let mut last_rx_remaining = usize::MAX;

        let outcome = loop {
            match self.drive_step(regs, tx) {
                Step::Done(outcome) => break outcome,
                Step::Sent => idle_spins = 0,
                Step::Waiting { rx_remaining } => {
                    if rx_remaining != last_rx_remaining {
                        last_rx_remaining = rx_remaining;
                        idle_spins = 0;
                    } else {
                        idle_spins = idle_spins.saturating_add(1);
                    }
                    if poll.spin_limit.is_some_and(|limit| idle_spins >= limit) {
                        self.abort(regs, Failure::Stalled);
                    }
                }
            }
            core::hint::spin_loop();
        };

        self.collect(rx);
        outcome
    }

    /// Publish received bytes and return to `Idle`
    ///
    /// Copies the received prefix of the window into `rx` and returns how
    /// many bytes that was. Bytes of `rx` past that prefix are untouched.
    pub fn collect(&self, rx: &mut [u8]) -> usize {
        self.shared.lock(|cell| {
            let mut shared = cell.borrow_mut();
            let received = shared.cursor.received();
            let count = received.len().min(rx.len());
            rx[..count].copy_from_slice(&received[..count]);
            shared.phase = shared.phase.transition(Event::Finish);
            count
        })
    }
}
