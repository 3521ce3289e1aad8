//! `embedded-hal` bus adapter
//!
//! Binds a controller to one peer so device drivers written against
//! [`embedded_hal::spi::SpiBus`] can use it. The engine is strictly
//! full-duplex, so the adapter supplies zeros for reads and a scratch sink
//! for writes. Every call is one message: armed on entry, disarmed on exit.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::spi::{ErrorType, SpiBus};
use usartspi_hal::{ClockSource, PinStates, RegisterBank};

use crate::controller::UsartSpi;
use crate::error::TransferError;
use crate::peer::Peer;
use crate::transfer::Transfer;

/// Bytes staged on the stack per chunk when a side has no real buffer
const SCRATCH: usize = 32;

/// A controller bound to one configured peer
pub struct UsartSpiBus<'c, R, C, P, M, const W: usize>
where
    M: RawMutex,
{
    spi: &'c UsartSpi<R, C, P, M, W>,
    peer: &'c Peer,
    speed_hz: u32,
}

impl<'c, R, C, P, M, const W: usize> UsartSpiBus<'c, R, C, P, M, W>
where
    R: RegisterBank,
    C: ClockSource,
    P: PinStates,
    M: RawMutex,
{
    /// Bind `peer` at `speed_hz` (0 for the peer's maximum)
    ///
    /// Fails if the peer has not been set up.
    pub fn new(
        spi: &'c UsartSpi<R, C, P, M, W>,
        peer: &'c Peer,
        speed_hz: u32,
    ) -> Result<Self, TransferError> {
        if !peer.is_configured() {
            return Err(TransferError::PeerNotConfigured);
        }
        Ok(Self {
            spi,
            peer,
            speed_hz: spi.resolve_speed(peer, speed_hz),
        })
    }

    /// Bit clock in use
    pub fn speed_hz(&self) -> u32 {
        self.speed_hz
    }

    fn message(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<(), TransferError>,
    ) -> Result<(), TransferError> {
        self.spi.prepare_message(self.peer)?;
        let outcome = f(self);
        self.spi.unprepare_message(self.peer).unwrap_or_else(|never| match never {});
        outcome
    }

    fn exchange(&self, tx: &[u8], rx: &mut [u8]) -> Result<(), TransferError> {
        let mut xfer = Transfer::new(tx, rx).with_speed(self.speed_hz);
        self.spi.transfer_one(self.peer, &mut xfer)
    }

    fn read_zeros(&self, words: &mut [u8]) -> Result<(), TransferError> {
        let zeros = [0u8; SCRATCH];
        for chunk in words.chunks_mut(SCRATCH) {
            let len = chunk.len();
            self.exchange(&zeros[..len], chunk)?;
        }
        Ok(())
    }

    fn write_discard(&self, words: &[u8]) -> Result<(), TransferError> {
        let mut sink = [0u8; SCRATCH];
        for chunk in words.chunks(SCRATCH) {
            self.exchange(chunk, &mut sink[..chunk.len()])?;
        }
        Ok(())
    }
}

impl<R, C, P, M, const W: usize> ErrorType for UsartSpiBus<'_, R, C, P, M, W>
where
    M: RawMutex,
{
    type Error = TransferError;
}

impl<R, C, P, M, const W: usize> SpiBus<u8> for UsartSpiBus<'_, R, C, P, M, W>
where
    R: RegisterBank,
    C: ClockSource,
    P: PinStates,
    M: RawMutex,
{
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.message(|bus| bus.read_zeros(words))
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.message(|bus| bus.write_discard(words))
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.message(|bus| {
            let common = read.len().min(write.len());
            let (read_head, read_tail) = read.split_at_mut(common);
            bus.exchange(&write[..common], read_head)?;
            bus.read_zeros(read_tail)?;
            bus.write_discard(&write[common..])
        })
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.message(|bus| {
            let mut staged = [0u8; SCRATCH];
            for chunk in words.chunks_mut(SCRATCH) {
                let len = chunk.len();
                staged[..len].copy_from_slice(chunk);
                bus.exchange(&staged[..len], chunk)?;
            }
            Ok(())
        })
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // transfer_one only returns once every byte was clocked in
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControllerConfig, PollPolicy};
    use crate::regs::ir;
    use crate::sim::{irq_line, SimBank, SimClock, SimPins};
    use core::sync::atomic::{AtomicBool, Ordering};
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    type TestSpi<'a> = UsartSpi<&'a SimBank, SimClock, SimPins, CriticalSectionRawMutex, 8>;

    fn attach(sim: &SimBank) -> TestSpi<'_> {
        let config = ControllerConfig {
            poll: PollPolicy::bounded(5_000_000),
        };
        UsartSpi::attach(sim, SimClock::new(48_000_000), SimPins::default(), 3, config).unwrap()
    }

    fn on_line<T>(spi: &TestSpi<'_>, sim: &SimBank, f: impl FnOnce() -> T) -> T {
        let stop = AtomicBool::new(false);
        std::thread::scope(|scope| {
            scope.spawn(|| irq_line(sim, &stop, || spi.on_interrupt()));
            let out = f();
            stop.store(true, Ordering::Release);
            out
        })
    }

    #[test]
    fn test_unconfigured_peer_rejected() {
        let sim = SimBank::new();
        let spi = attach(&sim);
        let peer = Peer::new(0);
        assert!(matches!(
            UsartSpiBus::new(&spi, &peer, 0),
            Err(TransferError::PeerNotConfigured)
        ));
    }

    #[test]
    fn test_read_clocks_out_zeros() {
        let sim = SimBank::with_replies(&[7, 8, 9]);
        let spi = attach(&sim);
        let mut peer = Peer::new(0);
        spi.setup(&mut peer).unwrap();
        let mut buf = [0u8; 3];

        on_line(&spi, &sim, || {
            let mut bus = UsartSpiBus::new(&spi, &peer, 1_000_000).unwrap();
            bus.read(&mut buf)
        })
        .unwrap();

        assert_eq!(buf, [7, 8, 9]);
        sim.with(|s| {
            assert_eq!(s.sent.as_slice(), &[0, 0, 0]);
            assert_eq!(s.brgr, 48);
            assert_eq!(s.imr & ir::OVRE_RXRDY, 0);
        });
    }

    #[test]
    fn test_uneven_transfer_pads() {
        let sim = SimBank::with_replies(&[1, 2, 3, 4]);
        let spi = attach(&sim);
        let mut peer = Peer::new(0);
        spi.setup(&mut peer).unwrap();
        let mut read = [0u8; 2];

        on_line(&spi, &sim, || {
            let mut bus = UsartSpiBus::new(&spi, &peer, 0).unwrap();
            bus.transfer(&mut read, &[0xA0, 0xA1, 0xA2, 0xA3])
        })
        .unwrap();

        assert_eq!(read, [1, 2]);
        sim.with(|s| assert_eq!(s.sent.as_slice(), &[0xA0, 0xA1, 0xA2, 0xA3]));
    }

    #[test]
    fn test_transfer_in_place_longer_than_scratch() {
        let sim = SimBank::new();
        let spi = attach(&sim);
        let mut peer = Peer::new(0).with_mode(usartspi_hal::SpiMode::default().with_loopback());
        spi.setup(&mut peer).unwrap();
        let mut words: [u8; 40] = core::array::from_fn(|i| i as u8);
        let expected = words;

        on_line(&spi, &sim, || {
            let mut bus = UsartSpiBus::new(&spi, &peer, 0).unwrap();
            bus.transfer_in_place(&mut words)?;
            bus.flush()
        })
        .unwrap();

        assert_eq!(words, expected);
        assert_eq!(sim.with(|s| s.sent.len()), 40);
    }
}
