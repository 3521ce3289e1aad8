//! Message bracket
//!
//! Register sequences around each message and around peripheral
//! (re)initialization. The framework serializes messages per controller,
//! so arm and disarm never nest.

use usartspi_hal::{Register, RegisterBank};

use crate::regs::{cr, ir, mr};

/// Enable both paths, arm OVRE/RXRDY and load the peer's mode
pub fn arm<R: RegisterBank>(regs: &R, mode_register: u32) {
    regs.write32(Register::Control, cr::ENABLE);
    regs.write32(Register::InterruptEnable, ir::OVRE_RXRDY);
    regs.write32(Register::Mode, mode_register);
}

/// Reset and disable both paths, then silence OVRE/RXRDY
pub fn disarm<R: RegisterBank>(regs: &R) {
    regs.write32(Register::Control, cr::RESET | cr::DISABLE);
    regs.write32(Register::InterruptDisable, ir::OVRE_RXRDY);
}

/// Baseline mode followed by reset and disable
pub fn init<R: RegisterBank>(regs: &R) {
    regs.write32(Register::Mode, mr::INIT);
    regs.write32(Register::Control, cr::RESET | cr::DISABLE);
}
