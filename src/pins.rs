//! GPIO / peripheral pin assignments for the lightning station board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// AS3935 on VSPI (SPI3)
// ---------------------------------------------------------------------------

/// Chip select for the AS3935 (active LOW).
pub const AS3935_CS_GPIO: i32 = 25;
/// Digital input: the AS3935 drives IRQ HIGH when an event is latched.
pub const AS3935_IRQ_GPIO: i32 = 32;

/// VSPI default clock line.
pub const SPI_SCLK_GPIO: i32 = 18;
/// VSPI default MISO line.
pub const SPI_MISO_GPIO: i32 = 19;
/// VSPI default MOSI line.
pub const SPI_MOSI_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// SPI configuration
// ---------------------------------------------------------------------------

/// SPI clock for the AS3935.  The chip tolerates up to 2 MHz.
pub const AS3935_SPI_BAUDRATE_HZ: u32 = 2_000_000;

