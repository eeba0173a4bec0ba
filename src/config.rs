//! Compile-time configuration for both firmware images

use embassy_time::Duration;

/// Tick period of the Morse blinker, also the base unit of its symbol timing
pub const MORSE_TICK: Duration = Duration::from_micros(500_000);

/// How long channel A stays asserted for a dot
pub const DOT_HOLD: Duration = Duration::from_micros(500_000);

/// How long channel B stays asserted for a dash
pub const DASH_HOLD: Duration = Duration::from_micros(1_500_000);

/// Pause after every symbol, spaces included
pub const SYMBOL_PAUSE: Duration = Duration::from_micros(500_000);

/// Pause after the last symbol of a message
pub const WORD_PAUSE: Duration = Duration::from_micros(3_500_000);

/// Scheduling quantum of the thermostat, the setpoint task runs on every tick
pub const THERMOSTAT_TICK: Duration = Duration::from_micros(200_000);

pub const SAMPLE_PERIOD: Duration = Duration::from_millis(500);

pub const CONTROL_PERIOD: Duration = Duration::from_secs(1);

/// Setpoint in °C after reset
pub const DEFAULT_SETPOINT: i16 = 30;

pub const UART_BAUDRATE: u32 = 115_200;

pub const I2C_FREQUENCY_HZ: u32 = 400_000;
