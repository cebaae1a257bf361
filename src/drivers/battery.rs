// Li-ion battery voltage estimation
//
// The cell is sensed through a 2:1 divider. ADC with 11dB attenuation
// gives 0..2500mV; multiply by 2 for actual cell voltage.
// Linear approximation: 4200mV = 100%, 3000mV = 0%.
//
// The pin map only says the divider exists, not which ADC channel it
// lands on, so a monitor is handed millivolts by whoever owns the ADC.

use crate::board::PinMap;

const DIVIDER_MULT: u32 = 2;

const VBAT_FULL_MV: u32 = 4200;
const VBAT_EMPTY_MV: u32 = 3000;

pub fn adc_to_battery_mv(adc_mv: u16) -> u16 {
    (adc_mv as u32 * DIVIDER_MULT).min(u16::MAX as u32) as u16
}

pub fn battery_percentage(battery_mv: u16) -> u8 {
    let mv = battery_mv as u32;
    if mv >= VBAT_FULL_MV {
        100
    } else if mv <= VBAT_EMPTY_MV {
        0
    } else {
        ((mv - VBAT_EMPTY_MV) * 100 / (VBAT_FULL_MV - VBAT_EMPTY_MV)) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatteryReading {
    pub millivolts: u16,
    pub percent: u8,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatteryMonitor {
    last: Option<BatteryReading>,
}

impl BatteryMonitor {
    /// `None` on boards without a battery sense divider.
    pub fn for_board(map: &PinMap) -> Option<Self> {
        map.battery_adc_present.then(Self::default)
    }

    pub fn sample(&mut self, adc_mv: u16) -> BatteryReading {
        let millivolts = adc_to_battery_mv(adc_mv);
        let reading = BatteryReading {
            millivolts,
            percent: battery_percentage(millivolts),
        };
        self.last = Some(reading);
        reading
    }

    pub fn last(&self) -> Option<BatteryReading> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PIN_MAP;

    #[test]
    fn test_percentage_clamps() {
        assert_eq!(battery_percentage(4300), 100);
        assert_eq!(battery_percentage(4200), 100);
        assert_eq!(battery_percentage(3600), 50);
        assert_eq!(battery_percentage(3000), 0);
        assert_eq!(battery_percentage(2500), 0);
    }

    #[test]
    fn test_divider() {
        assert_eq!(adc_to_battery_mv(1900), 3800);
        assert_eq!(adc_to_battery_mv(u16::MAX), u16::MAX);
    }

    #[test]
    fn test_monitor_follows_flag() {
        let mut monitor = BatteryMonitor::for_board(&PIN_MAP).expect("board has battery ADC");
        assert_eq!(monitor.last(), None);
        let reading = monitor.sample(1800);
        assert_eq!(
            reading,
            BatteryReading {
                millivolts: 3600,
                percent: 50
            }
        );
        assert_eq!(monitor.last(), Some(reading));

        let mut no_batt = PIN_MAP;
        no_batt.battery_adc_present = false;
        assert!(BatteryMonitor::for_board(&no_batt).is_none());
    }
}
