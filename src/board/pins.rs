//! GPIO |     Function     |      Notes
//! -----+------------------+----------------------------------
//!  9   | LCD CS / TP INT  | QSPI chip select; touch INT is wired to the same pin
//! 10   | LCD SCLK         | QSPI clock
//! 11   | LCD SDIO0        | QSPI data 0
//! 12   | LCD SDIO1        | QSPI data 1
//! 13   | LCD SDIO2        | QSPI data 2
//! 14   | LCD SDIO3        | QSPI data 3
//! 15   | PCF8563 INT      | RTC alarm/timer, open drain, active LOW
//! 21   | LCD RST          | Reset (active low)
//! 38   | SD CS            | SD card chip select
//! 39   | SD MOSI          | SPI3 data out
//! 40   | SD MISO          | SPI3 data in
//! 41   | SD SCLK          | SPI3 clock
//! 42   | LCD EN           | Panel power enable
//! 47   | IIC SDA          | Shared I2C: touch controller + RTC
//! 48   | IIC SCL          | Shared I2C clock

// ----- AMOLED (QSPI) -----
pub const LCD_SDIO0: u8 = 11;
pub const LCD_SDIO1: u8 = 12;
pub const LCD_SDIO2: u8 = 13;
pub const LCD_SDIO3: u8 = 14;
pub const LCD_SCLK: u8 = 10;
pub const LCD_CS: u8 = 9;
pub const LCD_RST: u8 = 21;
pub const LCD_WIDTH: u16 = 466;
pub const LCD_HEIGHT: u16 = 466;

pub const LCD_EN: u8 = 42;

// ----- I2C -----
pub const IIC_SDA: u8 = 47;
pub const IIC_SCL: u8 = 48;

// ----- Touch -----
pub const TP_INT: u8 = 9; // same pad as LCD_CS

// ----- Battery -----
// Divider is fitted but the channel is not broken out in the pin map.
pub const BATTERY_VOLTAGE_ADC_DATA: bool = true;

// ----- SD Card (SPI3) -----
pub const SD_CS: u8 = 38;
pub const SD_MOSI: u8 = 39;
pub const SD_MISO: u8 = 40;
pub const SD_SCLK: u8 = 41;

// ----- RTC -----
pub const PCF8563_INT: u8 = 15;
