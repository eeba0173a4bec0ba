#![cfg_attr(not(test), no_std)]
//! Tick driven task sets for the NUCLEO-F767ZI: a Morse code blinker and a thermostat.
//!
//! Everything except [uart] and the `EmbassyTicks` source is hardware agnostic and
//! talks to the board through `embedded-hal` traits, so it runs on the host as well.

// must stay first, the logging macros are used by every other module
mod fmt;

pub mod cmd;
pub mod config;
pub mod error;
pub mod led;
pub mod morse;
pub mod thermostat;
pub mod tick;
pub mod tmp;

#[cfg(feature = "firmware")]
pub mod uart;
