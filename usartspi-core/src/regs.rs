//! USART register bit layout in SPI master mode

/// Control register command strobes
pub mod cr {
    /// Reset receiver
    pub const RSTRX: u32 = 1 << 2;
    /// Reset transmitter
    pub const RSTTX: u32 = 1 << 3;
    /// Receiver enable
    pub const RXEN: u32 = 1 << 4;
    /// Receiver disable
    pub const RXDIS: u32 = 1 << 5;
    /// Transmitter enable
    pub const TXEN: u32 = 1 << 6;
    /// Transmitter disable
    pub const TXDIS: u32 = 1 << 7;

    /// Reset both paths
    pub const RESET: u32 = RSTRX | RSTTX;
    /// Disable both paths
    pub const DISABLE: u32 = RXDIS | TXDIS;
    /// Enable both paths
    pub const ENABLE: u32 = RXEN | TXEN;
}

/// Mode register fields
pub mod mr {
    /// USART_MODE = SPI master
    pub const SPI_MASTER: u32 = 0x0E;
    /// Character length field, 0b11 = 8 bits
    pub const CHRL_8: u32 = 0b11 << 6;
    /// Clock phase
    pub const CPHA: u32 = 1 << 8;
    /// Local loopback
    pub const LOOP: u32 = 1 << 15;
    /// Clock polarity
    pub const CPOL: u32 = 1 << 16;
    /// Clock output select
    pub const CLKO: u32 = 1 << 18;
    /// Wait read data before transfer
    pub const WRDBT: u32 = 1 << 20;

    /// Baseline written at peripheral init
    pub const INIT: u32 = SPI_MASTER | CHRL_8 | CLKO | WRDBT;
}

/// Status / interrupt source bits (shared by CSR, IER and IDR)
pub mod ir {
    /// Receiver ready
    pub const RXRDY: u32 = 1 << 0;
    /// Transmitter ready
    pub const TXRDY: u32 = 1 << 1;
    /// Overrun error
    pub const OVRE: u32 = 1 << 5;

    /// Sources armed for the duration of a message
    pub const OVRE_RXRDY: u32 = OVRE | RXRDY;
}

/// Smallest divider the baud rate generator accepts
pub const MIN_CLK_DIV: u32 = 6;
/// Exclusive upper bound of the 16-bit divider field
pub const MAX_CLK_DIV: u32 = 1 << 16;
