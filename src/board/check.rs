//! Pin map validation
//!
//! The map itself never validates anything; this is the consumer side.
//! `check` walks every (signal, pin) pair and reports what a driver
//! author needs to know before claiming the pins: GPIOs the chip doesn't
//! have, pins the module already uses, strapping pins, and pins that two
//! signals share (those need arbitration by whoever owns them).

use core::fmt;

use heapless::Vec;

use super::gpio::{self, Reservation};
use super::pinmap::{PinMap, SIGNAL_COUNT, Signal};

pub const MAX_ISSUES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Issue {
    NoSuchGpio {
        signal: Signal,
        pin: u8,
    },
    Reserved {
        signal: Signal,
        pin: u8,
        reservation: Reservation,
    },
    Strapping {
        signal: Signal,
        pin: u8,
    },
    /// `first` comes before `second` in `Signal::ALL`.
    SharedPin {
        pin: u8,
        first: Signal,
        second: Signal,
    },
}

impl Issue {
    pub const fn severity(&self) -> Severity {
        match self {
            Issue::NoSuchGpio { .. } => Severity::Error,
            Issue::Reserved {
                reservation: Reservation::UsbJtag,
                ..
            } => Severity::Warning,
            Issue::Reserved { .. } => Severity::Error,
            Issue::Strapping { .. } | Issue::SharedPin { .. } => Severity::Warning,
        }
    }

    pub const fn pin(&self) -> u8 {
        match *self {
            Issue::NoSuchGpio { pin, .. }
            | Issue::Reserved { pin, .. }
            | Issue::Strapping { pin, .. }
            | Issue::SharedPin { pin, .. } => pin,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::NoSuchGpio { signal, pin } => {
                write!(f, "{} on GPIO{}: no such GPIO", signal, pin)
            }
            Issue::Reserved {
                signal,
                pin,
                reservation,
            } => write!(f, "{} on GPIO{}: used by {}", signal, pin, reservation),
            Issue::Strapping { signal, pin } => {
                write!(f, "{} on GPIO{}: strapping pin", signal, pin)
            }
            Issue::SharedPin { pin, first, second } => {
                write!(f, "GPIO{} shared by {} and {}", pin, first, second)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    issues: Vec<Issue, MAX_ISSUES>,
    truncated: bool,
}

impl Report {
    fn push(&mut self, issue: Issue) {
        if self.issues.push(issue).is_err() {
            self.truncated = true;
        }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity() == Severity::Error)
    }

    /// More issues were found than fit in the report.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn shared_pins(&self) -> impl Iterator<Item = (u8, Signal, Signal)> + '_ {
        self.issues.iter().filter_map(|issue| match *issue {
            Issue::SharedPin { pin, first, second } => Some((pin, first, second)),
            _ => None,
        })
    }
}

pub fn check(map: &PinMap) -> Report {
    let mut report = Report::default();
    let table = map.assignments();

    for &(signal, pin) in table.iter() {
        if !gpio::exists(pin) {
            report.push(Issue::NoSuchGpio { signal, pin });
            continue;
        }
        if let Some(reservation) = gpio::reservation(pin) {
            report.push(Issue::Reserved {
                signal,
                pin,
                reservation,
            });
        }
        if gpio::is_strapping(pin) {
            report.push(Issue::Strapping { signal, pin });
        }
    }

    for i in 0..SIGNAL_COUNT {
        for j in (i + 1)..SIGNAL_COUNT {
            let (first, a) = table[i];
            let (second, b) = table[j];
            if a == b {
                report.push(Issue::SharedPin {
                    pin: a,
                    first,
                    second,
                });
            }
        }
    }

    report
}
