//! Register bank simulator for host tests
//!
//! Models the USART in SPI master mode with WRDBT set: TXRDY is only
//! asserted once the previous reply has been read, every write to the
//! data-out register produces one reply in the data-in register, and an
//! overrun can be injected at a chosen byte. Collaborator doubles for the
//! clock, pins and message queue live here too.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::vec::Vec;

use usartspi_hal::{ClockSource, IrqReturn, MessageQueue, PinStates, Register, RegisterBank};

use crate::regs::{cr, ir, mr};

/// Observable state of the simulated peripheral
#[derive(Debug, Default)]
pub struct SimState {
    pub mode: u32,
    pub imr: u32,
    pub brgr: u32,
    pub control_log: Vec<u32>,
    pub tx_enabled: bool,
    pub rx_enabled: bool,
    pub rhr: Option<u8>,
    pub overrun: bool,
    /// Replies the peer clocks back, in order (0xFF once exhausted)
    pub replies: VecDeque<u8>,
    /// Bytes written to the data-out register
    pub sent: Vec<u8>,
    /// Bytes read from the data-in register
    pub read_count: usize,
    /// Replies placed in the data-in register
    pub delivered: usize,
    /// Raise OVRE when reply number `k` (0-based) arrives
    pub overrun_at: Option<usize>,
    /// Status reads with TXRDY low after each write
    pub txrdy_delay: u32,
    busy_reads: u32,
    /// Never raise TXRDY
    pub stuck: bool,
    pub version: u32,
}

impl SimState {
    fn status_bits(&self) -> u32 {
        let mut csr = 0;
        if self.tx_enabled && !self.stuck && self.busy_reads == 0 && self.rhr.is_none() {
            csr |= ir::TXRDY;
        }
        if self.rhr.is_some() {
            csr |= ir::RXRDY;
        }
        if self.overrun {
            csr |= ir::OVRE;
        }
        csr
    }
}

/// Simulated register bank
#[derive(Debug, Default)]
pub struct SimBank {
    state: Mutex<SimState>,
}

impl SimBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Peer that answers with `replies`
    pub fn with_replies(replies: &[u8]) -> Self {
        let sim = Self::new();
        sim.with(|s| s.replies.extend(replies.iter().copied()));
        sim
    }

    /// Inspect or tweak the simulated state
    pub fn with<T>(&self, f: impl FnOnce(&mut SimState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    /// Check if an enabled interrupt source is asserted
    pub fn irq_pending(&self) -> bool {
        self.with(|s| s.status_bits() & s.imr != 0)
    }
}

impl RegisterBank for SimBank {
    fn read32(&self, reg: Register) -> u32 {
        self.with(|s| match reg {
            Register::Status => {
                let csr = s.status_bits();
                s.busy_reads = s.busy_reads.saturating_sub(1);
                csr
            }
            Register::Mode => s.mode,
            Register::BaudRateGenerator => s.brgr,
            Register::Version => s.version,
            Register::ReceiveData => {
                s.read_count += usize::from(s.rhr.is_some());
                s.rhr.take().map(u32::from).unwrap_or(0)
            }
            _ => 0,
        })
    }

    fn write32(&self, reg: Register, value: u32) {
        self.with(|s| match reg {
            Register::Control => {
                s.control_log.push(value);
                if value & cr::RSTRX != 0 {
                    s.rhr = None;
                    s.overrun = false;
                }
                if value & cr::RXEN != 0 {
                    s.rx_enabled = true;
                }
                if value & cr::TXEN != 0 {
                    s.tx_enabled = true;
                }
                if value & cr::RXDIS != 0 {
                    s.rx_enabled = false;
                }
                if value & cr::TXDIS != 0 {
                    s.tx_enabled = false;
                }
            }
            Register::Mode => s.mode = value,
            Register::InterruptEnable => s.imr |= value,
            Register::InterruptDisable => s.imr &= !value,
            Register::BaudRateGenerator => s.brgr = value,
            Register::TransmitData => {
                let byte = value as u8;
                s.sent.push(byte);
                let reply = if s.mode & mr::LOOP != 0 {
                    byte
                } else {
                    s.replies.pop_front().unwrap_or(0xFF)
                };
                if s.overrun_at == Some(s.delivered) {
                    s.overrun = true;
                }
                s.rhr = Some(reply);
                s.delivered += 1;
                s.busy_reads = s.txrdy_delay;
            }
            _ => {}
        })
    }

    fn read8(&self, reg: Register) -> u8 {
        self.read32(reg) as u8
    }

    fn write8(&self, reg: Register, value: u8) {
        self.write32(reg, u32::from(value))
    }
}

/// Play the interrupt controller: call `handler` whenever an enabled
/// source is asserted, until `stop` is set
pub fn irq_line(sim: &SimBank, stop: &AtomicBool, handler: impl Fn() -> IrqReturn) -> usize {
    let mut handled = 0;
    while !stop.load(Ordering::Acquire) {
        if sim.irq_pending() {
            if handler().is_handled() {
                handled += 1;
            }
        } else {
            std::thread::yield_now();
        }
    }
    handled
}

/// Clock double
#[derive(Debug)]
pub struct SimClock {
    pub rate_hz: u32,
    pub enabled: bool,
    pub fail_enable: bool,
    pub enable_calls: u32,
    pub disable_calls: u32,
}

impl SimClock {
    pub fn new(rate_hz: u32) -> Self {
        Self {
            rate_hz,
            enabled: false,
            fail_enable: false,
            enable_calls: 0,
            disable_calls: 0,
        }
    }
}

impl ClockSource for SimClock {
    type Error = ();

    fn enable(&mut self) -> Result<(), ()> {
        self.enable_calls += 1;
        if self.fail_enable {
            return Err(());
        }
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) {
        self.disable_calls += 1;
        self.enabled = false;
    }

    fn rate_hz(&self) -> u32 {
        self.rate_hz
    }
}

/// Pin state double
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SimPins {
    pub sleeping: bool,
    pub switches: u32,
}

impl PinStates for SimPins {
    fn select_default(&mut self) {
        self.sleeping = false;
        self.switches += 1;
    }

    fn select_sleep(&mut self) {
        self.sleeping = true;
        self.switches += 1;
    }
}

/// Message queue double
#[derive(Debug, Default)]
pub struct SimQueue {
    pub running: bool,
    pub refuse: bool,
}

impl MessageQueue for SimQueue {
    type Error = ();

    fn quiesce(&mut self) -> Result<(), ()> {
        if self.refuse {
            return Err(());
        }
        self.running = false;
        Ok(())
    }

    fn restart(&mut self) -> Result<(), ()> {
        if self.refuse {
            return Err(());
        }
        self.running = true;
        Ok(())
    }
}
