//! One-shot hardware peripheral initialization.
//!
//! Builds the SPI device and IRQ input the detector driver runs on.  Called
//! once from `main()` before the poll loop starts.

use anyhow::{Context, Result};
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{Gpio18, Gpio19, Gpio23, Gpio25, Gpio32, Input, Pin, PinDriver, Pull};
use esp_idf_hal::spi::config::Config as SpiConfig;
use esp_idf_hal::spi::{SPI3, SpiDeviceDriver, SpiDriver, SpiDriverConfig};
use esp_idf_hal::units::Hertz;
use log::info;

use crate::drivers::as3935::{self, As3935};
use crate::pins;

/// SPI device the detector sits on.
pub type DetectorSpi = SpiDeviceDriver<'static, SpiDriver<'static>>;
/// IRQ line, high while an interrupt is latched.
pub type IrqPin = PinDriver<'static, Gpio32, Input>;
/// Detector driver as wired on the board.
pub type Detector = As3935<DetectorSpi, FreeRtos>;

/// Bus pins in the order the board routes them.
pub struct DetectorPins {
    pub sclk: Gpio18,
    pub miso: Gpio19,
    pub mosi: Gpio23,
    pub cs: Gpio25,
    pub irq: Gpio32,
}

fn check_pin(name: &str, actual: i32, expected: i32) -> Result<()> {
    anyhow::ensure!(
        actual == expected,
        "{} routed to GPIO{} but board map says GPIO{}",
        name,
        actual,
        expected
    );
    Ok(())
}

/// SPI3 (VSPI) in mode 1 at the board baudrate, plus the IRQ input.
pub fn init_detector(spi: SPI3, p: DetectorPins) -> Result<(Detector, IrqPin)> {
    check_pin("SCLK", p.sclk.pin(), pins::SPI_SCLK_GPIO)?;
    check_pin("MISO", p.miso.pin(), pins::SPI_MISO_GPIO)?;
    check_pin("MOSI", p.mosi.pin(), pins::SPI_MOSI_GPIO)?;
    check_pin("CS", p.cs.pin(), pins::AS3935_CS_GPIO)?;
    check_pin("IRQ", p.irq.pin(), pins::AS3935_IRQ_GPIO)?;

    let config = SpiConfig::new()
        .baudrate(Hertz(pins::AS3935_SPI_BAUDRATE_HZ))
        .data_mode(as3935::MODE);
    let device = SpiDeviceDriver::new_single(
        spi,
        p.sclk,
        p.mosi,
        Some(p.miso),
        Some(p.cs),
        &SpiDriverConfig::new(),
        &config,
    )
    .context("SPI3 device init")?;

    let mut irq = PinDriver::input(p.irq).context("IRQ pin init")?;
    irq.set_pull(Pull::Down).context("IRQ pull-down")?;

    info!(
        "hw_init: AS3935 on SPI3 (CS=GPIO{}, IRQ=GPIO{}, {} Hz)",
        pins::AS3935_CS_GPIO,
        pins::AS3935_IRQ_GPIO,
        pins::AS3935_SPI_BAUDRATE_HZ
    );
    Ok((As3935::new(device, FreeRtos), irq))
}
