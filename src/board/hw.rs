//! ESP32-S3 bring-up: hands each subsystem its configured bus and pins.
//!
//! esp-hal peripherals are singletons, so every GPIO moves into exactly
//! one owner here. GPIO9 is both LCD_CS and TP_INT; the display takes it
//! as the hardware QSPI chip select and the touch controller is polled
//! over I2C instead of being interrupt driven.

use core::fmt;

use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::{
    Blocking,
    delay::Delay,
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::{self, master::I2c},
    peripherals::Peripherals,
    spi::{
        self,
        master::{Config as SpiConfig, Spi},
    },
    time::Rate,
};
use log::{info, warn};

use super::pins;
use crate::drivers::sdcard::{SD_INIT_FREQ_HZ, SD_NORMAL_FREQ_HZ};

// CO5300 tops out around 80MHz on QSPI; 40 leaves margin on the flex cable.
pub const LCD_QSPI_FREQ_MHZ: u32 = 40;

// Touch controller and PCF8563 both handle fast mode.
pub const I2C_FREQ_KHZ: u32 = 400;

// The peripheral fields below are picked by name; keep them in step
// with the numbers in `pins`.
const _: () = {
    assert!(pins::LCD_SCLK == 10);
    assert!(pins::LCD_CS == 9);
    assert!(pins::LCD_SDIO0 == 11);
    assert!(pins::LCD_SDIO1 == 12);
    assert!(pins::LCD_SDIO2 == 13);
    assert!(pins::LCD_SDIO3 == 14);
    assert!(pins::LCD_RST == 21);
    assert!(pins::LCD_EN == 42);
    assert!(pins::IIC_SDA == 47);
    assert!(pins::IIC_SCL == 48);
    assert!(pins::SD_CS == 38);
    assert!(pins::SD_MOSI == 39);
    assert!(pins::SD_MISO == 40);
    assert!(pins::SD_SCLK == 41);
    assert!(pins::PCF8563_INT == 15);
};

// Type Aliases
pub type QspiBus = Spi<'static, Blocking>;
pub type SdSpiBus = Spi<'static, Blocking>;
pub type SdSpiDevice = ExclusiveDevice<SdSpiBus, Output<'static>, Delay>;
pub type I2cBus = I2c<'static, Blocking>;

#[derive(Debug)]
pub enum BoardError {
    DisplaySpi(spi::master::ConfigError),
    SdSpi(spi::master::ConfigError),
    I2c(i2c::master::ConfigError),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::DisplaySpi(e) => write!(f, "display QSPI config: {:?}", e),
            BoardError::SdSpi(e) => write!(f, "SD SPI config: {:?}", e),
            BoardError::I2c(e) => write!(f, "I2C config: {:?}", e),
        }
    }
}

// Hardware Bundles
/// AMOLED panel: QSPI bus (CS driven by the peripheral) plus power/reset.
pub struct DisplayHw {
    pub qspi: QspiBus,
    pub rst: Output<'static>,
    pub en: Output<'static>,
}

/// SD card on its own SPI bus, at the slow init clock until
/// [`SdHw::raise_clock`] runs.
pub struct SdHw {
    pub spi: SdSpiDevice,
}

/// PCF8563 alarm/timer line. Open drain, LOW while a flag is pending.
pub struct RtcHw {
    pub int: Input<'static>,
}

/// Complete board hardware, ready for driver initialization.
pub struct Board {
    pub display: DisplayHw,
    /// Shared by the touch controller and the RTC.
    pub i2c: I2cBus,
    pub sd: SdHw,
    pub rtc: RtcHw,
}

impl Board {
    pub fn init(p: Peripherals) -> Result<Self, BoardError> {
        let display = DisplayHw::init(
            p.SPI2, p.GPIO10, p.GPIO9, p.GPIO11, p.GPIO12, p.GPIO13, p.GPIO14, p.GPIO21, p.GPIO42,
        )?;
        warn!(
            "TP_INT shares GPIO{} with LCD_CS; touch runs polled",
            pins::TP_INT
        );

        let i2c_cfg = i2c::master::Config::default().with_frequency(Rate::from_khz(I2C_FREQ_KHZ));
        let i2c = I2c::new(p.I2C0, i2c_cfg)
            .map_err(BoardError::I2c)?
            .with_sda(p.GPIO47)
            .with_scl(p.GPIO48);

        let sd = SdHw::init(p.SPI3, p.GPIO41, p.GPIO39, p.GPIO40, p.GPIO38)?;

        let rtc = RtcHw {
            int: Input::new(p.GPIO15, InputConfig::default().with_pull(Pull::Up)),
        };

        info!("board {} up", super::BOARD_VARIANT);
        Ok(Board {
            display,
            i2c,
            sd,
            rtc,
        })
    }
}

impl DisplayHw {
    #[allow(clippy::too_many_arguments)]
    fn init(
        spi2: esp_hal::peripherals::SPI2<'static>,
        sclk: esp_hal::peripherals::GPIO10<'static>,
        cs: esp_hal::peripherals::GPIO9<'static>,
        sdio0: esp_hal::peripherals::GPIO11<'static>,
        sdio1: esp_hal::peripherals::GPIO12<'static>,
        sdio2: esp_hal::peripherals::GPIO13<'static>,
        sdio3: esp_hal::peripherals::GPIO14<'static>,
        rst: esp_hal::peripherals::GPIO21<'static>,
        en: esp_hal::peripherals::GPIO42<'static>,
    ) -> Result<Self, BoardError> {
        // Panel power first, reset released; the controller driver does
        // its own reset pulse.
        let en = Output::new(en, Level::High, OutputConfig::default());
        let rst = Output::new(rst, Level::High, OutputConfig::default());

        let cfg = SpiConfig::default()
            .with_frequency(Rate::from_mhz(LCD_QSPI_FREQ_MHZ))
            .with_mode(spi::Mode::_0);
        let qspi = Spi::new(spi2, cfg)
            .map_err(BoardError::DisplaySpi)?
            .with_sck(sclk)
            .with_cs(cs)
            .with_sio0(sdio0)
            .with_sio1(sdio1)
            .with_sio2(sdio2)
            .with_sio3(sdio3);

        Ok(DisplayHw { qspi, rst, en })
    }
}

impl SdHw {
    fn init(
        spi3: esp_hal::peripherals::SPI3<'static>,
        sclk: esp_hal::peripherals::GPIO41<'static>,
        mosi: esp_hal::peripherals::GPIO39<'static>,
        miso: esp_hal::peripherals::GPIO40<'static>,
        cs: esp_hal::peripherals::GPIO38<'static>,
    ) -> Result<Self, BoardError> {
        let cs = Output::new(cs, Level::High, OutputConfig::default());

        let cfg = SpiConfig::default()
            .with_frequency(Rate::from_hz(SD_INIT_FREQ_HZ))
            .with_mode(spi::Mode::_0);
        let bus = Spi::new(spi3, cfg)
            .map_err(BoardError::SdSpi)?
            .with_sck(sclk)
            .with_mosi(mosi)
            .with_miso(miso);

        let spi = ExclusiveDevice::new(bus, cs, Delay::new()).unwrap_or_else(|e| match e {});
        Ok(SdHw { spi })
    }

    /// Hand to `SdStorage::new`; runs once the card has answered.
    pub fn raise_clock(dev: &mut SdSpiDevice) {
        let cfg = SpiConfig::default()
            .with_frequency(Rate::from_hz(SD_NORMAL_FREQ_HZ))
            .with_mode(spi::Mode::_0);
        match dev.bus_mut().apply_config(&cfg) {
            Ok(()) => info!("SD SPI at {} MHz", SD_NORMAL_FREQ_HZ / 1_000_000),
            Err(e) => warn!("SD SPI stays at init clock: {:?}", e),
        }
    }
}
