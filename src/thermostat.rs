//! Thermostat task set: setpoint, sampling and control, all ticked from one scheduler.
//!
//! On every tick the setpoint task consumes the pending button [Command]. The sampling
//! task reads the sensor once per [SAMPLE_PERIOD] and the control task switches the
//! heater and reports a [StatusLine] once per [CONTROL_PERIOD]; both are gated by a
//! [Cadence], so their effective periods are whole multiples of the tick.

use core::fmt::{self, Write};

use embassy_time::Instant;
use embedded_hal::digital::OutputPin;

use crate::cmd::{Command, CommandLatch};
use crate::config::{CONTROL_PERIOD, DEFAULT_SETPOINT, SAMPLE_PERIOD};
use crate::led::Indicator;
use crate::tick::{Cadence, TickTask};
use crate::tmp::TemperatureSensor;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Session {
    /// last successfully sampled temperature in °C
    pub temperature: i16,
    pub setpoint: i16,
    pub heater_on: bool,
    /// number of status reports, one per control period
    pub elapsed_seconds: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            temperature: 0,
            setpoint: DEFAULT_SETPOINT,
            heater_on: false,
            elapsed_seconds: 0,
        }
    }
}

impl Session {
    pub fn status_line(&self) -> StatusLine {
        StatusLine {
            temperature: self.temperature,
            setpoint: self.setpoint,
            heater_on: self.heater_on,
            elapsed_seconds: self.elapsed_seconds,
        }
    }
}

/// `<temperature,setpoint,heater,seconds>`, zero padded to 2, 2, 1 and 4 digits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub temperature: i16,
    pub setpoint: i16,
    pub heater_on: bool,
    pub elapsed_seconds: u32,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{:02},{:02},{},{:04}>",
            self.temperature,
            self.setpoint,
            u8::from(self.heater_on),
            self.elapsed_seconds
        )
    }
}

/// Single threshold control without dead band. Equal temperatures keep the heater as is.
pub fn heater_decision(temperature: i16, setpoint: i16, heater_on: bool) -> bool {
    if temperature > setpoint {
        false
    } else if temperature < setpoint {
        true
    } else {
        heater_on
    }
}

pub struct Thermostat<'a, S, P, W> {
    session: Session,
    sensor: S,
    heater: Indicator<P>,
    out: W,
    commands: &'a CommandLatch,
    sample_cadence: Cadence,
    control_cadence: Cadence,
}

impl<'a, S, P, W> Thermostat<'a, S, P, W>
where
    S: TemperatureSensor,
    P: OutputPin,
    W: Write,
{
    /// Both cadences count from `start`, the heater LED starts off
    pub fn new(sensor: S, heater: P, out: W, commands: &'a CommandLatch, start: Instant) -> Self {
        let session = Session::default();
        Self {
            heater: Indicator::new(heater, session.heater_on),
            session,
            sensor,
            out,
            commands,
            sample_cadence: Cadence::new(SAMPLE_PERIOD, start),
            control_cadence: Cadence::new(CONTROL_PERIOD, start),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn out(&self) -> &W {
        &self.out
    }

    pub fn heater(&self) -> &Indicator<P> {
        &self.heater
    }

    pub fn release(self) -> (S, P, W) {
        (self.sensor, self.heater.release(), self.out)
    }

    /// Setpoint task. The latch is cleared even when nothing was pending.
    pub fn update_setpoint(&mut self) -> Command {
        let command = self.commands.take();
        match command {
            Command::Increase => self.session.setpoint = self.session.setpoint.saturating_add(1),
            Command::Decrease => self.session.setpoint = self.session.setpoint.saturating_sub(1),
            Command::None => {}
        }
        if command != Command::None {
            debug!("setpoint {} after {}", self.session.setpoint, command.as_str());
        }
        command
    }

    /// Sampling task. A failed read is reported and the previous temperature is kept.
    pub fn sample(&mut self) {
        match self.sensor.read() {
            Ok(temperature) => self.session.temperature = temperature,
            Err(err) => {
                warn!("temperature read failed: {}", err);
                let _ = write!(self.out, "Error reading temperature sensor({})\n\r", err);
                let _ = write!(
                    self.out,
                    "Please power cycle your board by unplugging USB and plugging back in.\n\r"
                );
            }
        }
    }

    /// Control task. Switches the heater, counts the second and reports the status.
    pub fn control(&mut self) {
        let session = &mut self.session;
        session.heater_on = heater_decision(session.temperature, session.setpoint, session.heater_on);
        self.heater.set(session.heater_on);
        session.elapsed_seconds = session.elapsed_seconds.wrapping_add(1);

        let line = session.status_line();
        let _ = write!(self.out, "{}\n\r", line);
    }
}

impl<S, P, W> TickTask for Thermostat<'_, S, P, W>
where
    S: TemperatureSensor,
    P: OutputPin,
    W: Write,
{
    fn on_tick(&mut self, now: Instant) {
        self.update_setpoint();
        if self.sample_cadence.due(now) {
            self.sample();
        }
        if self.control_cadence.due(now) {
            self.control();
        }
    }
}
