//! Peripheral clock abstraction

/// Gate and rate of the clock feeding the USART
pub trait ClockSource {
    /// Error type for enabling the clock
    type Error;

    /// Prepare and enable the clock
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Disable and unprepare the clock
    fn disable(&mut self);

    /// Current rate in Hz
    fn rate_hz(&self) -> u32;
}
