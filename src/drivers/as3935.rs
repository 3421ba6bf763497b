//! AS3935 Franklin lightning sensor over SPI.
//!
//! The chip speaks a two-byte SPI protocol in mode 1: the first byte carries
//! the register address in bits [5:0] and the access mode in bits [7:6]
//! (`00` write, `01` read); the second byte is the data.  Settings share
//! registers, so every setter is a read-modify-write of its own field.
//!
//! Values are masked to the field width and written as-is.  The only
//! setting with a lookup is the strike threshold (1/5/9/16 → 0..3).
//!
//! # References
//! - AMS AS3935 datasheet v1-04, §8 "Register Table"

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Mode, Operation, Phase, Polarity, SpiDevice};

use crate::app::ports::DetectorPort;
use crate::config::AfeMode;
use crate::error::SensorError;

/// SPI mode 1: clock idles low, data sampled on the falling edge.
pub const MODE: Mode = Mode {
    polarity: Polarity::IdleLow,
    phase: Phase::CaptureOnSecondTransition,
};

mod reg {
    pub const AFE_GAIN: u8 = 0x00;
    pub const THRESHOLD: u8 = 0x01;
    pub const LIGHTNING: u8 = 0x02;
    pub const INT_MASK_ANT: u8 = 0x03;
    pub const ENERGY_LSB: u8 = 0x04;
    pub const ENERGY_MSB: u8 = 0x05;
    pub const ENERGY_MMSB: u8 = 0x06;
    pub const DISTANCE: u8 = 0x07;
}

const READ_FLAG: u8 = 0x40;
const ADDR_MASK: u8 = 0x3F;

/// A register field: mask in place, shift to the LSB.
#[derive(Clone, Copy)]
struct Field {
    reg: u8,
    mask: u8,
    shift: u8,
}

const AFE_GB: Field = Field { reg: reg::AFE_GAIN, mask: 0b0011_1110, shift: 1 };
const NF_LEV: Field = Field { reg: reg::THRESHOLD, mask: 0b0111_0000, shift: 4 };
const WDTH: Field = Field { reg: reg::THRESHOLD, mask: 0b0000_1111, shift: 0 };
const MIN_NUM_LIGH: Field = Field { reg: reg::LIGHTNING, mask: 0b0011_0000, shift: 4 };
const SREJ: Field = Field { reg: reg::LIGHTNING, mask: 0b0000_1111, shift: 0 };
const MASK_DIST: Field = Field { reg: reg::INT_MASK_ANT, mask: 0b0010_0000, shift: 5 };
const INT: Field = Field { reg: reg::INT_MASK_ANT, mask: 0b0000_1111, shift: 0 };
const DISTANCE: Field = Field { reg: reg::DISTANCE, mask: 0b0011_1111, shift: 0 };
const ENERGY_MMSB: Field = Field { reg: reg::ENERGY_MMSB, mask: 0b0001_1111, shift: 0 };

/// Register 0x00 bits [7:6] read back as zero on a live chip.
const AFE_RESERVED: u8 = 0b1100_0000;

/// The chip needs 2 ms after IRQ goes high before INT is valid.
const INT_SETTLE_MS: u32 = 2;

/// Distance value the chip reports when the storm is out of range.
pub const DISTANCE_OUT_OF_RANGE: u8 = 0x3F;
/// Distance value for a storm overhead.
pub const DISTANCE_OVERHEAD: u8 = 0x01;

fn encode_strike_threshold(strikes: u8) -> Option<u8> {
    match strikes {
        1 => Some(0),
        5 => Some(1),
        9 => Some(2),
        16 => Some(3),
        _ => None,
    }
}

fn decode_strike_threshold(bits: u8) -> u8 {
    match bits & 0b11 {
        0 => 1,
        1 => 5,
        2 => 9,
        _ => 16,
    }
}

pub struct As3935<SPI, D> {
    spi: SPI,
    delay: D,
}

impl<SPI, D> As3935<SPI, D>
where
    SPI: SpiDevice<u8>,
    D: DelayNs,
{
    /// Wrap an SPI device configured for [`MODE`] at up to 2 MHz.
    pub fn new(spi: SPI, delay: D) -> Self {
        Self { spi, delay }
    }

    /// Give back the bus and delay.
    pub fn release(self) -> (SPI, D) {
        (self.spi, self.delay)
    }

    // ── Register access ───────────────────────────────────────

    fn read_register(&mut self, addr: u8) -> Result<u8, SensorError> {
        let mut buf = [0u8];
        self.spi
            .transaction(&mut [
                Operation::Write(&[READ_FLAG | (addr & ADDR_MASK)]),
                Operation::Read(&mut buf),
            ])
            .map_err(|_| SensorError::Bus)?;
        Ok(buf[0])
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), SensorError> {
        self.spi
            .write(&[addr & ADDR_MASK, value])
            .map_err(|_| SensorError::Bus)
    }

    fn read_field(&mut self, field: Field) -> Result<u8, SensorError> {
        Ok((self.read_register(field.reg)? & field.mask) >> field.shift)
    }

    fn write_field(&mut self, field: Field, value: u8) -> Result<(), SensorError> {
        let current = self.read_register(field.reg)?;
        let updated = (current & !field.mask) | ((value << field.shift) & field.mask);
        self.write_register(field.reg, updated)
    }
}

impl<SPI, D> DetectorPort for As3935<SPI, D>
where
    SPI: SpiDevice<u8>,
    D: DelayNs,
{
    fn probe(&mut self) -> Result<(), SensorError> {
        let afe = self.read_register(reg::AFE_GAIN)?;
        if afe & AFE_RESERVED != 0 {
            return Err(SensorError::NotResponding);
        }
        Ok(())
    }

    fn set_afe_mode(&mut self, mode: AfeMode) -> Result<(), SensorError> {
        self.write_field(AFE_GB, mode.gain_bits())
    }

    fn afe_mode(&mut self) -> Result<Option<AfeMode>, SensorError> {
        Ok(AfeMode::from_gain_bits(self.read_field(AFE_GB)?))
    }

    fn set_disturbers_masked(&mut self, masked: bool) -> Result<(), SensorError> {
        self.write_field(MASK_DIST, u8::from(masked))
    }

    fn disturbers_masked(&mut self) -> Result<bool, SensorError> {
        Ok(self.read_field(MASK_DIST)? == 1)
    }

    fn set_noise_floor(&mut self, level: u8) -> Result<(), SensorError> {
        self.write_field(NF_LEV, level)
    }

    fn noise_floor(&mut self) -> Result<u8, SensorError> {
        self.read_field(NF_LEV)
    }

    fn set_watchdog_threshold(&mut self, level: u8) -> Result<(), SensorError> {
        self.write_field(WDTH, level)
    }

    fn watchdog_threshold(&mut self) -> Result<u8, SensorError> {
        self.read_field(WDTH)
    }

    fn set_spike_rejection(&mut self, level: u8) -> Result<(), SensorError> {
        self.write_field(SREJ, level)
    }

    fn spike_rejection(&mut self) -> Result<u8, SensorError> {
        self.read_field(SREJ)
    }

    fn set_strike_threshold(&mut self, strikes: u8) -> Result<(), SensorError> {
        let bits = encode_strike_threshold(strikes)
            .ok_or(SensorError::InvalidSetting("strike_threshold"))?;
        self.write_field(MIN_NUM_LIGH, bits)
    }

    fn strike_threshold(&mut self) -> Result<u8, SensorError> {
        Ok(decode_strike_threshold(self.read_field(MIN_NUM_LIGH)?))
    }

    fn read_interrupt(&mut self) -> Result<u8, SensorError> {
        self.delay.delay_ms(INT_SETTLE_MS);
        self.read_field(INT)
    }

    fn distance_km(&mut self) -> Result<u8, SensorError> {
        self.read_field(DISTANCE)
    }

    fn strike_energy(&mut self) -> Result<u32, SensorError> {
        let lsb = u32::from(self.read_register(reg::ENERGY_LSB)?);
        let msb = u32::from(self.read_register(reg::ENERGY_MSB)?);
        let mmsb = u32::from(self.read_field(ENERGY_MMSB)?);
        Ok((mmsb << 16) | (msb << 8) | lsb)
    }
}
