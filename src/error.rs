//! Error classes of both programs.
//!
//! [InitError] is fatal and ends in a halt, [ReadError] is reported and the
//! program carries on with the previous value.

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    #[error("periodic timer could not be started")]
    Timer,

    #[error("UART could not be opened")]
    Uart,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReadError {
    /// discovery found no sensor at any of the candidate addresses
    #[error("no temperature sensor detected")]
    NotDetected,

    #[error("I2C transfer failed: {0:?}")]
    Bus(ErrorKind),
}

/// Parks the core for good after a failed initialization. There is no recovery
/// and no watchdog, the board has to be reset.
#[cfg(feature = "firmware")]
pub fn halt(err: InitError) -> ! {
    error!("initialization failed: {}, halting", err);
    loop {
        cortex_m::asm::wfi();
    }
}
