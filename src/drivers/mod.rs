// Chip drivers that don't depend on the board: the PCF8563 clock, SD
// storage with RTC timestamps, and battery voltage math. They only see
// embedded-hal traits; board/ decides which pins and buses they get.

pub mod battery;
pub mod pcf8563;
pub mod sdcard;
