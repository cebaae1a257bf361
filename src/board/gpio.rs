//! ESP32-S3 GPIO facts used when validating a pin map.
//!
//! The S3 has GPIO0..=21 and GPIO26..=48; 22..=25 are not bonded out.
//! GPIO26..=32 carry the SPI flash, and 33..=37 the octal PSRAM on
//! modules that fit one. GPIO19/20 are the USB-Serial-JTAG D-/D+ pair.

use core::fmt;

pub const MAX_GPIO: u8 = 48;

pub const STRAPPING_PINS: [u8; 4] = [0, 3, 45, 46];

/// Something on the module already uses the pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    SpiFlash,
    OctalPsram,
    UsbJtag,
}

impl Reservation {
    pub const fn name(self) -> &'static str {
        match self {
            Reservation::SpiFlash => "SPI flash",
            Reservation::OctalPsram => "octal PSRAM",
            Reservation::UsbJtag => "USB-Serial-JTAG",
        }
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcUnit {
    Adc1,
    Adc2,
}

pub const fn exists(pin: u8) -> bool {
    matches!(pin, 0..=21 | 26..=MAX_GPIO)
}

pub const fn reservation(pin: u8) -> Option<Reservation> {
    match pin {
        26..=32 => Some(Reservation::SpiFlash),
        33..=37 => Some(Reservation::OctalPsram),
        19 | 20 => Some(Reservation::UsbJtag),
        _ => None,
    }
}

pub const fn is_strapping(pin: u8) -> bool {
    let mut i = 0;
    while i < STRAPPING_PINS.len() {
        if STRAPPING_PINS[i] == pin {
            return true;
        }
        i += 1;
    }
    false
}

// ADC2 is unusable while WiFi is running; callers that care should
// prefer ADC1 pins.
pub const fn adc_unit(pin: u8) -> Option<AdcUnit> {
    match pin {
        1..=10 => Some(AdcUnit::Adc1),
        11..=20 => Some(AdcUnit::Adc2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpio_holes() {
        assert!(exists(0));
        assert!(exists(21));
        for pin in 22..=25 {
            assert!(!exists(pin), "GPIO{} should not exist", pin);
        }
        assert!(exists(26));
        assert!(exists(48));
        assert!(!exists(49));
    }

    #[test]
    fn test_reservations() {
        assert_eq!(reservation(29), Some(Reservation::SpiFlash));
        assert_eq!(reservation(35), Some(Reservation::OctalPsram));
        assert_eq!(reservation(20), Some(Reservation::UsbJtag));
        assert_eq!(reservation(38), None);
    }

    #[test]
    fn test_strapping_and_adc() {
        assert!(is_strapping(0));
        assert!(is_strapping(46));
        assert!(!is_strapping(9));

        assert_eq!(adc_unit(9), Some(AdcUnit::Adc1));
        assert_eq!(adc_unit(15), Some(AdcUnit::Adc2));
        assert_eq!(adc_unit(42), None);
    }
}
