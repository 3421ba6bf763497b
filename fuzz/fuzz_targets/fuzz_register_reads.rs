//! Fuzz target: AS3935 register decoding
//!
//! Serves arbitrary bytes as the answer to every SPI read and drives each
//! `DetectorPort` getter plus the interrupt poller.  Asserts that nothing
//! panics and that decoded values stay inside their field widths.
//!
//! cargo fuzz run fuzz_register_reads

#![no_main]

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{ErrorKind, ErrorType, Operation, SpiDevice};
use libfuzzer_sys::fuzz_target;
use stormwatch::app::poller::InterruptKind;
use stormwatch::app::ports::DetectorPort;
use stormwatch::drivers::as3935::As3935;

struct ScriptedBus<'a> {
    bytes: core::slice::Iter<'a, u8>,
}

impl ErrorType for ScriptedBus<'_> {
    type Error = ErrorKind;
}

impl SpiDevice for ScriptedBus<'_> {
    fn transaction(&mut self, ops: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        for op in ops {
            if let Operation::Read(buf) = op {
                for b in buf.iter_mut() {
                    *b = *self.bytes.next().ok_or(ErrorKind::Other)?;
                }
            }
        }
        Ok(())
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

fuzz_target!(|data: &[u8]| {
    let mut chip = As3935::new(ScriptedBus { bytes: data.iter() }, NoDelay);

    let _ = chip.probe();
    let _ = chip.afe_mode();
    let _ = chip.disturbers_masked();
    if let Ok(v) = chip.noise_floor() {
        assert!(v <= 0x07);
    }
    if let Ok(v) = chip.watchdog_threshold() {
        assert!(v <= 0x0F);
    }
    if let Ok(v) = chip.spike_rejection() {
        assert!(v <= 0x0F);
    }
    if let Ok(v) = chip.strike_threshold() {
        assert!(matches!(v, 1 | 5 | 9 | 16));
    }
    if let Ok(v) = chip.read_interrupt() {
        assert!(v <= 0x0F);
        let _ = InterruptKind::classify(v);
    }
    if let Ok(v) = chip.distance_km() {
        assert!(v <= 0x3F);
    }
    if let Ok(v) = chip.strike_energy() {
        assert!(v < 1 << 21);
    }
});
