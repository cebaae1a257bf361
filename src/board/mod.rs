//! DO0143FMST10 Board Support Package (BSP)
//!
//! This module maps the board's physical hardware to named subsystems so
//! that application code doesn't need to know GPIO numbers. The numbers
//! live in [`pins`] (flat constants) and [`pinmap`] (one immutable
//! record); [`check`] validates a map against the ESP32-S3 GPIO matrix
//! described in [`gpio`]. Peripheral bring-up is only built for the chip.

pub mod check;
pub mod gpio;
pub mod pinmap;
pub mod pins;

#[cfg(target_arch = "xtensa")]
mod hw;

pub use check::{Issue, Report, Severity, check};
#[cfg(feature = "do0143fmst10")]
pub use pinmap::{BOARD_VARIANT, PIN_MAP};
pub use pinmap::{BoardVariant, Peripheral, PinMap, Signal};

#[cfg(target_arch = "xtensa")]
pub use hw::{
    Board, BoardError, DisplayHw, I2C_FREQ_KHZ, I2cBus, LCD_QSPI_FREQ_MHZ, QspiBus, RtcHw, SdHw,
    SdSpiBus, SdSpiDevice,
};
