// Board support for the 1.43" round AMOLED touch board (ESP32-S3)

#![cfg_attr(not(test), no_std)]

#[cfg(not(feature = "do0143fmst10"))]
compile_error!("no board variant selected; enable the `do0143fmst10` feature");

pub mod board;
pub mod drivers;
