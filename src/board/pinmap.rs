//! The board pin map as a single immutable record.
//!
//! `PIN_MAP` carries the same numbers as the flat constants in
//! [`super::pins`]; drivers can take whichever form reads better.

use core::fmt;

use super::gpio;
use super::pins;

/// Board SKU/revision this configuration targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardVariant {
    /// 1.43" 466x466 round AMOLED, CO5300 QSPI controller.
    Do0143Fmst10,
}

impl BoardVariant {
    pub const fn name(self) -> &'static str {
        match self {
            BoardVariant::Do0143Fmst10 => "DO0143FMST10",
        }
    }
}

impl fmt::Display for BoardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(feature = "do0143fmst10")]
pub const BOARD_VARIANT: BoardVariant = BoardVariant::Do0143Fmst10;

/// Which consumer a signal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Peripheral {
    Display,
    I2cBus,
    Touch,
    SdCard,
    Rtc,
}

/// Every pin-carrying line in the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    LcdSdio0,
    LcdSdio1,
    LcdSdio2,
    LcdSdio3,
    LcdSclk,
    LcdCs,
    LcdRst,
    LcdEn,
    I2cSda,
    I2cScl,
    TouchInt,
    SdCs,
    SdMosi,
    SdMiso,
    SdSclk,
    RtcInt,
}

pub const SIGNAL_COUNT: usize = 16;

impl Signal {
    pub const ALL: [Signal; SIGNAL_COUNT] = [
        Signal::LcdSdio0,
        Signal::LcdSdio1,
        Signal::LcdSdio2,
        Signal::LcdSdio3,
        Signal::LcdSclk,
        Signal::LcdCs,
        Signal::LcdRst,
        Signal::LcdEn,
        Signal::I2cSda,
        Signal::I2cScl,
        Signal::TouchInt,
        Signal::SdCs,
        Signal::SdMosi,
        Signal::SdMiso,
        Signal::SdSclk,
        Signal::RtcInt,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Signal::LcdSdio0 => "LCD_SDIO0",
            Signal::LcdSdio1 => "LCD_SDIO1",
            Signal::LcdSdio2 => "LCD_SDIO2",
            Signal::LcdSdio3 => "LCD_SDIO3",
            Signal::LcdSclk => "LCD_SCLK",
            Signal::LcdCs => "LCD_CS",
            Signal::LcdRst => "LCD_RST",
            Signal::LcdEn => "LCD_EN",
            Signal::I2cSda => "IIC_SDA",
            Signal::I2cScl => "IIC_SCL",
            Signal::TouchInt => "TP_INT",
            Signal::SdCs => "SD_CS",
            Signal::SdMosi => "SD_MOSI",
            Signal::SdMiso => "SD_MISO",
            Signal::SdSclk => "SD_SCLK",
            Signal::RtcInt => "PCF8563_INT",
        }
    }

    pub const fn peripheral(self) -> Peripheral {
        match self {
            Signal::LcdSdio0
            | Signal::LcdSdio1
            | Signal::LcdSdio2
            | Signal::LcdSdio3
            | Signal::LcdSclk
            | Signal::LcdCs
            | Signal::LcdRst
            | Signal::LcdEn => Peripheral::Display,
            Signal::I2cSda | Signal::I2cScl => Peripheral::I2cBus,
            Signal::TouchInt => Peripheral::Touch,
            Signal::SdCs | Signal::SdMosi | Signal::SdMiso | Signal::SdSclk => Peripheral::SdCard,
            Signal::RtcInt => Peripheral::Rtc,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed at build time; there is exactly one of these per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    pub board_variant: BoardVariant,

    pub lcd_data_pins: [u8; 4],
    pub lcd_clock_pin: u8,
    pub lcd_chip_select_pin: u8,
    pub lcd_reset_pin: u8,
    pub lcd_width: u16,
    pub lcd_height: u16,
    pub lcd_enable_pin: u8,

    pub i2c_data_pin: u8,
    pub i2c_clock_pin: u8,

    pub touch_interrupt_pin: u8,

    /// A battery divider is wired to an ADC input (channel unspecified).
    pub battery_adc_present: bool,

    pub sd_chip_select_pin: u8,
    pub sd_mosi_pin: u8,
    pub sd_miso_pin: u8,
    pub sd_clock_pin: u8,

    pub rtc_interrupt_pin: u8,
}

#[cfg(feature = "do0143fmst10")]
pub const PIN_MAP: PinMap = PinMap {
    board_variant: BOARD_VARIANT,

    lcd_data_pins: [pins::LCD_SDIO0, pins::LCD_SDIO1, pins::LCD_SDIO2, pins::LCD_SDIO3],
    lcd_clock_pin: pins::LCD_SCLK,
    lcd_chip_select_pin: pins::LCD_CS,
    lcd_reset_pin: pins::LCD_RST,
    lcd_width: pins::LCD_WIDTH,
    lcd_height: pins::LCD_HEIGHT,
    lcd_enable_pin: pins::LCD_EN,

    i2c_data_pin: pins::IIC_SDA,
    i2c_clock_pin: pins::IIC_SCL,

    touch_interrupt_pin: pins::TP_INT,

    battery_adc_present: pins::BATTERY_VOLTAGE_ADC_DATA,

    sd_chip_select_pin: pins::SD_CS,
    sd_mosi_pin: pins::SD_MOSI,
    sd_miso_pin: pins::SD_MISO,
    sd_clock_pin: pins::SD_SCLK,

    rtc_interrupt_pin: pins::PCF8563_INT,
};

// A pin number the chip doesn't have is a typo, not a runtime condition.
#[cfg(feature = "do0143fmst10")]
const _: () = assert!(PIN_MAP.all_pins_exist(), "pin map names a GPIO the ESP32-S3 lacks");

impl PinMap {
    pub const fn pin(&self, signal: Signal) -> u8 {
        match signal {
            Signal::LcdSdio0 => self.lcd_data_pins[0],
            Signal::LcdSdio1 => self.lcd_data_pins[1],
            Signal::LcdSdio2 => self.lcd_data_pins[2],
            Signal::LcdSdio3 => self.lcd_data_pins[3],
            Signal::LcdSclk => self.lcd_clock_pin,
            Signal::LcdCs => self.lcd_chip_select_pin,
            Signal::LcdRst => self.lcd_reset_pin,
            Signal::LcdEn => self.lcd_enable_pin,
            Signal::I2cSda => self.i2c_data_pin,
            Signal::I2cScl => self.i2c_clock_pin,
            Signal::TouchInt => self.touch_interrupt_pin,
            Signal::SdCs => self.sd_chip_select_pin,
            Signal::SdMosi => self.sd_mosi_pin,
            Signal::SdMiso => self.sd_miso_pin,
            Signal::SdSclk => self.sd_clock_pin,
            Signal::RtcInt => self.rtc_interrupt_pin,
        }
    }

    /// All (signal, pin) pairs, in `Signal::ALL` order.
    pub const fn assignments(&self) -> [(Signal, u8); SIGNAL_COUNT] {
        let mut out = [(Signal::LcdSdio0, 0u8); SIGNAL_COUNT];
        let mut i = 0;
        while i < SIGNAL_COUNT {
            let signal = Signal::ALL[i];
            out[i] = (signal, self.pin(signal));
            i += 1;
        }
        out
    }

    pub fn signals_on(&self, pin: u8) -> impl Iterator<Item = Signal> + '_ {
        Signal::ALL
            .into_iter()
            .filter(move |&signal| self.pin(signal) == pin)
    }

    pub const fn all_pins_exist(&self) -> bool {
        let mut i = 0;
        while i < SIGNAL_COUNT {
            if !gpio::exists(self.pin(Signal::ALL[i])) {
                return false;
            }
            i += 1;
        }
        true
    }

    pub const fn pixel_count(&self) -> u32 {
        self.lcd_width as u32 * self.lcd_height as u32
    }
}
