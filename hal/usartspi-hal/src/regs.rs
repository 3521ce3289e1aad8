//! Register bank abstraction
//!
//! One accessor per named register of the USART block, parameterized by
//! access width. Implementations perform the bus access and nothing else:
//! no caching, no read-modify-write.

/// Named registers of the USART block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Control (write-only command strobes)
    Control,
    /// Mode
    Mode,
    /// Interrupt enable (write-only)
    InterruptEnable,
    /// Interrupt disable (write-only)
    InterruptDisable,
    /// Channel status
    Status,
    /// Receive holding register
    ReceiveData,
    /// Transmit holding register
    TransmitData,
    /// Baud rate generator
    BaudRateGenerator,
    /// IP version
    Version,
}

impl Register {
    /// Byte offset from the peripheral base address
    pub const fn offset(self) -> usize {
        match self {
            Register::Control => 0x00,
            Register::Mode => 0x04,
            Register::InterruptEnable => 0x08,
            Register::InterruptDisable => 0x0C,
            Register::Status => 0x14,
            Register::ReceiveData => 0x18,
            Register::TransmitData => 0x1C,
            Register::BaudRateGenerator => 0x20,
            Register::Version => 0xFC,
        }
    }
}

/// Access to the USART register bank
///
/// Methods take `&self` because the bank is shared between the polling
/// context and the interrupt context. Implementations must be safe to call
/// from both.
pub trait RegisterBank {
    /// Read a 32-bit register
    fn read32(&self, reg: Register) -> u32;

    /// Write a 32-bit register
    fn write32(&self, reg: Register, value: u32);

    /// Read the low byte of a register
    fn read8(&self, reg: Register) -> u8;

    /// Write the low byte of a register
    fn write8(&self, reg: Register, value: u8);
}

impl<T: RegisterBank + ?Sized> RegisterBank for &T {
    fn read32(&self, reg: Register) -> u32 {
        (**self).read32(reg)
    }

    fn write32(&self, reg: Register, value: u32) {
        (**self).write32(reg, value)
    }

    fn read8(&self, reg: Register) -> u8 {
        (**self).read8(reg)
    }

    fn write8(&self, reg: Register, value: u8) {
        (**self).write8(reg, value)
    }
}
