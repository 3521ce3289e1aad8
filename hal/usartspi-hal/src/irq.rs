//! Interrupt attribution

/// Result of an interrupt handler on a possibly shared line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqReturn {
    /// The event was raised by this device and has been serviced
    Handled,
    /// Not this device; another handler on the line should look
    NotMine,
}

impl IrqReturn {
    /// Check if the event was serviced
    pub fn is_handled(&self) -> bool {
        matches!(self, IrqReturn::Handled)
    }
}
