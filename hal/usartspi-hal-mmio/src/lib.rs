//! Memory-mapped implementation of the usartspi register bank
//!
//! Relaxed volatile accesses at fixed offsets from the peripheral base
//! address. This is the only place in the workspace that touches raw
//! peripheral memory.

#![no_std]

use core::ptr;

use usartspi_hal::{Register, RegisterBank};

/// USART register window mapped at a fixed address
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MmioRegisterBank {
    base: usize,
}

impl MmioRegisterBank {
    /// Wrap the register window starting at `base`
    ///
    /// # Safety
    ///
    /// `base` must be the address of a mapped USART register block that
    /// stays mapped for the lifetime of the returned value, and no other
    /// owner may drive the same block concurrently.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Base address of the window
    pub fn base(&self) -> usize {
        self.base
    }

    fn addr(&self, reg: Register) -> usize {
        self.base + reg.offset()
    }
}

impl RegisterBank for MmioRegisterBank {
    fn read32(&self, reg: Register) -> u32 {
        // SAFETY: `new` guarantees the block is mapped; offsets are aligned
        unsafe { ptr::read_volatile(self.addr(reg) as *const u32) }
    }

    fn write32(&self, reg: Register, value: u32) {
        // SAFETY: see `read32`
        unsafe { ptr::write_volatile(self.addr(reg) as *mut u32, value) }
    }

    fn read8(&self, reg: Register) -> u8 {
        // SAFETY: see `read32`
        unsafe { ptr::read_volatile(self.addr(reg) as *const u8) }
    }

    fn write8(&self, reg: Register, value: u8) {
        // SAFETY: see `read32`
        unsafe { ptr::write_volatile(self.addr(reg) as *mut u8, value) }
    }
}
