// amoled-bsp bring-up firmware
//
// Boot sequence: log pin map -> validate it -> hardware -> RTC -> SD
// Main loop: poll the RTC once a second, feed the FAT time source, and
// service the PCF8563 alarm line when it goes low.

#![no_std]
#![no_main]

use core::cell::RefCell;

use embedded_hal_bus::i2c::RefCellDevice;
use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::delay::Delay;
use log::{error, info, warn};

use amoled_bsp::board::{self, Board, PIN_MAP, SdHw, Severity};
use amoled_bsp::drivers::battery::BatteryMonitor;
use amoled_bsp::drivers::pcf8563::Pcf8563;
use amoled_bsp::drivers::sdcard::{RtcTimeSource, SdStorage};

esp_bootloader_esp_idf::esp_app_desc!();

const RTC_POLL_MS: u32 = 1000;

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("booting {}...", PIN_MAP.board_variant);
    for (signal, pin) in PIN_MAP.assignments() {
        info!("  GPIO{:<2} {}", pin, signal);
    }
    info!(
        "  LCD {}x{}, battery ADC {}",
        PIN_MAP.lcd_width,
        PIN_MAP.lcd_height,
        if PIN_MAP.battery_adc_present { "present" } else { "absent" }
    );

    let report = board::check(&PIN_MAP);
    for issue in report.issues() {
        match issue.severity() {
            Severity::Warning => warn!("pin map: {}", issue),
            Severity::Error => error!("pin map: {}", issue),
        }
    }
    if report.has_errors() {
        panic!("pin map failed validation");
    }

    let board = match Board::init(peripherals) {
        Ok(board) => board,
        Err(e) => panic!("board init failed: {}", e),
    };
    let Board {
        display: _display,
        i2c,
        sd,
        rtc,
    } = board;
    info!("hardware initialized.");

    // touch controller and RTC share this bus
    let i2c = RefCell::new(i2c);
    let mut clock = Pcf8563::new(RefCellDevice::new(&i2c));

    if let Err(e) = clock.init() {
        warn!("rtc init: {}", e);
    }
    match clock.clock_integrity_lost() {
        Ok(true) => warn!("rtc: backup supply was lost, time not trusted"),
        Ok(false) => {}
        Err(e) => warn!("rtc: {}", e),
    }
    match clock.datetime() {
        Ok(now) => {
            info!("rtc: {}", now);
            RtcTimeSource::set(now);
        }
        Err(e) => warn!("rtc read failed: {}", e),
    }
    if let Err(e) = clock.enable_alarm_interrupt(true) {
        warn!("rtc alarm irq: {}", e);
    }

    let storage = SdStorage::new(sd.spi, Delay::new(), RtcTimeSource, SdHw::raise_clock);
    let sd_ok = storage
        .volume_mgr
        .open_volume(embedded_sdmmc::VolumeIdx(0))
        .is_ok();
    info!("sd volume: {}", if sd_ok { "mounted" } else { "unavailable" });

    // No channel is wired in the pin map yet; the monitor only exists
    // so consumers can see the capability.
    if BatteryMonitor::for_board(&PIN_MAP).is_some() {
        info!("battery sense divider fitted");
    }

    info!("bring-up done.");

    let delay = Delay::new();
    loop {
        delay.delay_millis(RTC_POLL_MS);

        match clock.datetime() {
            Ok(now) => RtcTimeSource::set(now),
            Err(e) => warn!("rtc read failed: {}", e),
        }

        if rtc.int.is_low() {
            match clock.alarm_fired() {
                Ok(true) => {
                    info!("rtc alarm at {}", RtcTimeSource::now());
                    if let Err(e) = clock.clear_alarm_flag() {
                        warn!("rtc clear: {}", e);
                    }
                }
                Ok(false) => {}
                Err(e) => warn!("rtc: {}", e),
            }
        }
    }
}
