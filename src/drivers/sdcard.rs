// SD card over SPI with FAT volume manager
// FAT timestamps come from the PCF8563; the firmware pushes a fresh
// reading into RtcTimeSource whenever it polls the clock.

use core::cell::Cell;

use critical_section::Mutex;

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;
use embedded_sdmmc::{SdCard, TimeSource, Timestamp, VolumeManager};
use log::{info, warn};

use super::pcf8563::DateTime;

// sd card initialization frequency (Hz).
pub const SD_INIT_FREQ_HZ: u32 = 400_000;

// Normal operating frequency after init
pub const SD_NORMAL_FREQ_HZ: u32 = 20_000_000;

// Used until the RTC has been read once.
pub const FALLBACK_TIME: DateTime = DateTime {
    year: 2025,
    month: 1,
    day: 1,
    weekday: 3,
    hours: 0,
    minutes: 0,
    seconds: 0,
};

static NOW: Mutex<Cell<DateTime>> = Mutex::new(Cell::new(FALLBACK_TIME));

// Zero sized so VolumeManager can own one while the main loop keeps
// updating the shared reading.
#[derive(Default, Clone, Copy)]
pub struct RtcTimeSource;

impl RtcTimeSource {
    pub fn set(now: DateTime) {
        if now.is_valid() {
            critical_section::with(|cs| NOW.borrow(cs).set(now));
        } else {
            warn!("rtc: ignoring invalid time {}", now);
        }
    }

    pub fn now() -> DateTime {
        critical_section::with(|cs| NOW.borrow(cs).get())
    }
}

// Saturates rather than wrapping past the u8 year field.
pub fn to_timestamp(dt: &DateTime) -> Timestamp {
    Timestamp {
        year_since_1970: (dt.year.saturating_sub(1970)).min(u8::MAX as u16) as u8,
        zero_indexed_month: dt.month.saturating_sub(1),
        zero_indexed_day: dt.day.saturating_sub(1),
        hours: dt.hours,
        minutes: dt.minutes,
        seconds: dt.seconds,
    }
}

impl TimeSource for RtcTimeSource {
    fn get_timestamp(&self) -> Timestamp {
        to_timestamp(&Self::now())
    }
}

pub struct SdStorage<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    pub volume_mgr: VolumeManager<SdCard<SPI, D>, RtcTimeSource>,
}

impl<SPI, D> SdStorage<SPI, D>
where
    SPI: SpiDevice,
    D: DelayNs,
{
    // Probing triggers the SD init sequence (CMD0, CMD8, ACMD41, etc).
    // The card must be clocked at SD_INIT_FREQ_HZ until then; once it
    // answers, `raise_clock` gets the device to switch the bus to
    // SD_NORMAL_FREQ_HZ.
    pub fn new<F>(spi: SPI, delay: D, clock: RtcTimeSource, raise_clock: F) -> Self
    where
        F: FnOnce(&mut SPI),
    {
        let sdcard = SdCard::new(spi, delay);

        match sdcard.num_bytes() {
            Ok(bytes) => {
                info!("SD card: {} bytes ({} MB)", bytes, bytes / 1024 / 1024);
                sdcard.spi(raise_clock);
            }
            Err(e) => warn!("SD card probe failed: {:?}", e),
        }

        let volume_mgr = VolumeManager::new(sdcard, clock);
        Self { volume_mgr }
    }
}
