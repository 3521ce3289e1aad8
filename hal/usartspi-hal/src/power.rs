//! Power management hooks
//!
//! Only invoked around suspend/resume, never from the transfer path.

/// Pin multiplexing states of the controller's pins
pub trait PinStates {
    /// Route pins to the peripheral
    fn select_default(&mut self);

    /// Put pins in their quiescent low-power state
    fn select_sleep(&mut self);
}

/// Pins that need no state switching
impl PinStates for () {
    fn select_default(&mut self) {}

    fn select_sleep(&mut self) {}
}

/// The framework's message queue feeding a controller
pub trait MessageQueue {
    /// Error type for queue state changes
    type Error;

    /// Stop accepting messages and wait for the queue to drain
    fn quiesce(&mut self) -> Result<(), Self::Error>;

    /// Restart message processing
    fn restart(&mut self) -> Result<(), Self::Error>;
}
