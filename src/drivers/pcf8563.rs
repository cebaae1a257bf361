// PCF8563 real-time clock over I2C
//
// Registers 0x02..=0x08 hold seconds..years in BCD. Bit 7 of the
// seconds register (VL) latches when the backup supply dropped and the
// time can no longer be trusted; writing the time clears it.
// Bit 7 of the month register is the century flag: set means 21xx.
//
// INT (board::pins::PCF8563_INT) is open drain and stays low until
// AF/TF are cleared in control/status 2.

use core::fmt;

use embedded_hal::i2c::I2c;

pub const ADDRESS: u8 = 0x51;

mod reg {
    pub const CONTROL_STATUS_1: u8 = 0x00;
    pub const CONTROL_STATUS_2: u8 = 0x01;
    pub const VL_SECONDS: u8 = 0x02;
    pub const MINUTE_ALARM: u8 = 0x09;
}

// control/status 2 bits
#[allow(dead_code)]
const TIE: u8 = 1 << 0;
const AIE: u8 = 1 << 1;
const TF: u8 = 1 << 2;
const AF: u8 = 1 << 3;
#[allow(dead_code)]
const TI_TP: u8 = 1 << 4;

const VL: u8 = 1 << 7;
const CENTURY: u8 = 1 << 7;
const ALARM_DISABLE: u8 = 1 << 7;

pub const BASE_YEAR: u16 = 2000;
pub const MAX_YEAR: u16 = 2199;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    /// 0 = Sunday
    pub weekday: u8,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// 0 for a month outside 1..=12.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

impl DateTime {
    pub const fn is_valid(&self) -> bool {
        self.year >= BASE_YEAR
            && self.year <= MAX_YEAR
            && self.month >= 1
            && self.month <= 12
            && self.day >= 1
            && self.day <= days_in_month(self.year, self.month)
            && self.weekday <= 6
            && self.hours <= 23
            && self.minutes <= 59
            && self.seconds <= 59
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hours, self.minutes, self.seconds
        )
    }
}

/// Fields left `None` don't take part in the match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Alarm {
    pub minute: Option<u8>,
    pub hour: Option<u8>,
    pub day: Option<u8>,
    pub weekday: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    I2c(E),
    InvalidDateTime,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "i2c: {:?}", e),
            Error::InvalidDateTime => write!(f, "date/time out of range"),
        }
    }
}

pub const fn to_bcd(v: u8) -> u8 {
    ((v / 10) << 4) | (v % 10)
}

pub const fn from_bcd(v: u8) -> u8 {
    (v >> 4) * 10 + (v & 0x0F)
}

pub struct Pcf8563<I2C> {
    i2c: I2C,
}

impl<I2C, E> Pcf8563<I2C>
where
    I2C: I2c<Error = E>,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    pub fn release(self) -> I2C {
        self.i2c
    }

    fn read_reg(&mut self, reg: u8) -> Result<u8, Error<E>> {
        let mut buf = [0u8];
        self.i2c
            .write_read(ADDRESS, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(buf[0])
    }

    fn write_reg(&mut self, reg: u8, val: u8) -> Result<(), Error<E>> {
        self.i2c.write(ADDRESS, &[reg, val]).map_err(Error::I2c)
    }

    /// Start the oscillator with normal (non test) mode.
    pub fn init(&mut self) -> Result<(), Error<E>> {
        self.write_reg(reg::CONTROL_STATUS_1, 0x00)
    }

    pub fn datetime(&mut self) -> Result<DateTime, Error<E>> {
        let mut buf = [0u8; 7];
        self.i2c
            .write_read(ADDRESS, &[reg::VL_SECONDS], &mut buf)
            .map_err(Error::I2c)?;

        let century = if buf[5] & CENTURY != 0 { 100 } else { 0 };
        Ok(DateTime {
            seconds: from_bcd(buf[0] & 0x7F),
            minutes: from_bcd(buf[1] & 0x7F),
            hours: from_bcd(buf[2] & 0x3F),
            day: from_bcd(buf[3] & 0x3F),
            weekday: buf[4] & 0x07,
            month: from_bcd(buf[5] & 0x1F),
            year: BASE_YEAR + century + from_bcd(buf[6]) as u16,
        })
    }

    pub fn set_datetime(&mut self, dt: &DateTime) -> Result<(), Error<E>> {
        if !dt.is_valid() {
            return Err(Error::InvalidDateTime);
        }
        let offset = dt.year - BASE_YEAR;
        let century = if offset >= 100 { CENTURY } else { 0 };
        let yy = (offset % 100) as u8;

        // VL is bit 7 of the seconds byte; writing 0 there clears it.
        let frame = [
            reg::VL_SECONDS,
            to_bcd(dt.seconds),
            to_bcd(dt.minutes),
            to_bcd(dt.hours),
            to_bcd(dt.day),
            dt.weekday,
            to_bcd(dt.month) | century,
            to_bcd(yy),
        ];
        self.i2c.write(ADDRESS, &frame).map_err(Error::I2c)
    }

    pub fn clock_integrity_lost(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_reg(reg::VL_SECONDS)? & VL != 0)
    }

    pub fn set_alarm(&mut self, alarm: &Alarm) -> Result<(), Error<E>> {
        let field = |v: Option<u8>, max: u8, bcd: bool| -> Result<u8, Error<E>> {
            match v {
                None => Ok(ALARM_DISABLE),
                Some(v) if v > max => Err(Error::InvalidDateTime),
                Some(v) if bcd => Ok(to_bcd(v)),
                Some(v) => Ok(v),
            }
        };
        if alarm.day == Some(0) {
            return Err(Error::InvalidDateTime);
        }
        let frame = [
            reg::MINUTE_ALARM,
            field(alarm.minute, 59, true)?,
            field(alarm.hour, 23, true)?,
            field(alarm.day, 31, true)?,
            field(alarm.weekday, 6, false)?,
        ];
        self.i2c.write(ADDRESS, &frame).map_err(Error::I2c)
    }

    pub fn disable_alarm(&mut self) -> Result<(), Error<E>> {
        self.set_alarm(&Alarm::default())
    }

    pub fn enable_alarm_interrupt(&mut self, enable: bool) -> Result<(), Error<E>> {
        let ctrl = self.read_reg(reg::CONTROL_STATUS_2)?;
        // Writing 1 to AF/TF leaves them untouched; keep that so a pending
        // flag isn't lost here.
        let mut next = ctrl | AF | TF;
        if enable {
            next |= AIE;
        } else {
            next &= !AIE;
        }
        self.write_reg(reg::CONTROL_STATUS_2, next)
    }

    pub fn alarm_fired(&mut self) -> Result<bool, Error<E>> {
        Ok(self.read_reg(reg::CONTROL_STATUS_2)? & AF != 0)
    }

    /// Clears AF, releasing INT. Every other bit, TF included, is kept.
    pub fn clear_alarm_flag(&mut self) -> Result<(), Error<E>> {
        let ctrl = self.read_reg(reg::CONTROL_STATUS_2)?;
        self.write_reg(reg::CONTROL_STATUS_2, (ctrl & !(AF | TF)) | TF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::i2c::{ErrorType, Operation};

    /// Register file standing in for the chip. AF/TF follow the
    /// write-0-to-clear rule of control/status 2.
    #[derive(Default)]
    struct FakeRtc {
        regs: [u8; 16],
        ptr: usize,
    }

    impl ErrorType for FakeRtc {
        type Error = Infallible;
    }

    impl I2c for FakeRtc {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            assert_eq!(address, ADDRESS);
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        let (first, rest) = bytes.split_first().expect("empty write");
                        self.ptr = *first as usize;
                        for &b in rest {
                            if self.ptr == reg::CONTROL_STATUS_2 as usize {
                                let old = self.regs[self.ptr];
                                let flags = old & b & (AF | TF);
                                self.regs[self.ptr] = (b & !(AF | TF)) | flags;
                            } else {
                                self.regs[self.ptr] = b;
                            }
                            self.ptr = (self.ptr + 1) % 16;
                        }
                    }
                    Operation::Read(buf) => {
                        for b in buf.iter_mut() {
                            *b = self.regs[self.ptr];
                            self.ptr = (self.ptr + 1) % 16;
                        }
                    }
                }
            }
            Ok(())
        }
    }

    fn sample() -> DateTime {
        DateTime {
            year: 2026,
            month: 10,
            day: 19,
            weekday: 1,
            hours: 14,
            minutes: 7,
            seconds: 59,
        }
    }

    #[test]
    fn test_bcd() {
        assert_eq!(to_bcd(59), 0x59);
        assert_eq!(from_bcd(0x23), 23);
        assert_eq!(to_bcd(0), 0);
    }

    #[test]
    fn test_set_then_read_datetime() {
        let mut rtc = Pcf8563::new(FakeRtc::default());
        rtc.set_datetime(&sample()).unwrap();

        let fake = rtc.release();
        assert_eq!(fake.regs[0x02], 0x59);
        assert_eq!(fake.regs[0x07], 0x10);
        assert_eq!(fake.regs[0x08], 0x26);

        let mut rtc = Pcf8563::new(fake);
        assert_eq!(rtc.datetime().unwrap(), sample());
    }

    #[test]
    fn test_century_bit() {
        let mut rtc = Pcf8563::new(FakeRtc::default());
        let dt = DateTime {
            year: 2105,
            ..sample()
        };
        rtc.set_datetime(&dt).unwrap();
        let fake = rtc.release();
        assert_eq!(fake.regs[0x07], 0x10 | CENTURY);
        assert_eq!(fake.regs[0x08], 0x05);
        assert_eq!(Pcf8563::new(fake).datetime().unwrap().year, 2105);
    }

    #[test]
    fn test_invalid_datetime_rejected() {
        let mut rtc = Pcf8563::new(FakeRtc::default());
        let bad = DateTime {
            month: 13,
            ..sample()
        };
        assert_eq!(rtc.set_datetime(&bad), Err(Error::InvalidDateTime));
        let early = DateTime {
            year: 1999,
            ..sample()
        };
        assert_eq!(rtc.set_datetime(&early), Err(Error::InvalidDateTime));
    }

    #[test]
    fn test_vl_flag() {
        let mut fake = FakeRtc::default();
        fake.regs[0x02] = VL | 0x30;
        let mut rtc = Pcf8563::new(fake);
        assert!(rtc.clock_integrity_lost().unwrap());
        // status bits don't leak into the seconds value
        assert_eq!(rtc.datetime().unwrap().seconds, 30);

        rtc.set_datetime(&sample()).unwrap();
        assert!(!rtc.clock_integrity_lost().unwrap());
    }

    #[test]
    fn test_alarm_registers() {
        let mut rtc = Pcf8563::new(FakeRtc::default());
        rtc.set_alarm(&Alarm {
            minute: Some(30),
            hour: Some(7),
            ..Alarm::default()
        })
        .unwrap();
        let fake = rtc.release();
        assert_eq!(&fake.regs[0x09..=0x0C], &[0x30, 0x07, ALARM_DISABLE, ALARM_DISABLE]);

        let mut rtc = Pcf8563::new(fake);
        rtc.disable_alarm().unwrap();
        assert_eq!(
            &rtc.release().regs[0x09..=0x0C],
            &[ALARM_DISABLE; 4]
        );

        let mut rtc = Pcf8563::new(FakeRtc::default());
        let bad = Alarm {
            hour: Some(24),
            ..Alarm::default()
        };
        assert_eq!(rtc.set_alarm(&bad), Err(Error::InvalidDateTime));
    }

    #[test]
    fn test_alarm_flag_clear_keeps_enables() {
        let mut fake = FakeRtc::default();
        fake.regs[0x01] = AF | TF;
        let mut rtc = Pcf8563::new(fake);

        rtc.enable_alarm_interrupt(true).unwrap();
        assert!(rtc.alarm_fired().unwrap());

        rtc.clear_alarm_flag().unwrap();
        assert!(!rtc.alarm_fired().unwrap());

        let ctrl = rtc.release().regs[0x01];
        assert_eq!(ctrl & AIE, AIE);
        assert_eq!(ctrl & TF, TF);
    }

    #[test]
    fn test_month_lengths() {
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2028, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
        assert_eq!(days_in_month(2026, 13), 0);
    }

    #[test]
    fn test_nonexistent_dates_rejected() {
        let on = |year, month, day| DateTime {
            year,
            month,
            day,
            ..sample()
        };
        let mut rtc = Pcf8563::new(FakeRtc::default());
        for bad in [on(2026, 2, 31), on(2026, 2, 29), on(2026, 4, 31), on(2100, 2, 29)] {
            assert!(!bad.is_valid(), "{} accepted", bad);
            assert_eq!(rtc.set_datetime(&bad), Err(Error::InvalidDateTime));
        }

        let leap = on(2028, 2, 29);
        assert!(leap.is_valid());
        rtc.set_datetime(&leap).unwrap();
        assert_eq!(rtc.datetime().unwrap(), leap);
    }

    #[test]
    fn test_control_bits_survive_flag_handling() {
        let mut fake = FakeRtc::default();
        fake.regs[0x01] = TI_TP | AF | AIE | TIE;
        let mut rtc = Pcf8563::new(fake);

        rtc.clear_alarm_flag().unwrap();
        assert!(!rtc.alarm_fired().unwrap());
        rtc.enable_alarm_interrupt(false).unwrap();
        rtc.enable_alarm_interrupt(true).unwrap();

        assert_eq!(rtc.release().regs[0x01], TI_TP | AIE | TIE);
    }
}
