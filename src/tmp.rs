//! Functions to discover and read a TI TMP digital temperature sensor over I2C
//!
//! Boards were shipped with one of several TMP parts. [Tmp::discover] probes the
//! [SENSORS] table in order and keeps the first part that acknowledges, reporting
//! its progress on the text output. A board without any sensor is not fatal, every
//! read then fails with [ReadError::NotDetected].

use core::fmt::Write;

use embedded_hal::i2c::{Error as _, I2c};

use crate::error::ReadError;

pub const TMP11X_ADDR: u8 = 0x48;
pub const TMP116_ADDR: u8 = 0x49;
pub const TMP006_ADDR: u8 = 0x41;

// result registers, they hold the last conversion
const TMP11X_REG_TEMP: u8 = 0x00;
const TMP006_REG_TEMP: u8 = 0x01;

/// One LSB of the result register in °C is 1/128 (0.0078125)
const LSB_PER_DEGREE: i16 = 128;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorModel {
    pub id: &'static str,
    pub address: u8,
    pub result_reg: u8,
}

/// Candidates in probing order
pub const SENSORS: [SensorModel; 3] = [
    SensorModel {
        id: "11X",
        address: TMP11X_ADDR,
        result_reg: TMP11X_REG_TEMP,
    },
    SensorModel {
        id: "116",
        address: TMP116_ADDR,
        result_reg: TMP11X_REG_TEMP,
    },
    SensorModel {
        id: "006",
        address: TMP006_ADDR,
        result_reg: TMP006_REG_TEMP,
    },
];

/// Temperature sensor capability
pub trait TemperatureSensor {
    /// Whole degrees Celsius
    fn read(&mut self) -> Result<i16, ReadError>;
}

pub struct Tmp<I2C> {
    i2c: I2C,
    model: Option<SensorModel>,
}

impl<I2C: I2c> Tmp<I2C> {
    /// Probes every candidate of [SENSORS] until one acknowledges its result register.
    pub fn discover<W: Write>(mut i2c: I2C, out: &mut W) -> Self {
        let mut found = None;
        for model in SENSORS {
            let _ = write!(out, "Is this {}? ", model.id);
            if i2c.write(model.address, &[model.result_reg]).is_ok() {
                let _ = write!(out, "Found\n\r");
                found = Some(model);
                break;
            }
            let _ = write!(out, "No\n\r");
        }

        match found {
            Some(model) => {
                info!("detected TMP{} at {=u8:#x}", model.id, model.address);
                let _ = write!(
                    out,
                    "Detected TMP{} I2C address:{:x}\n\r",
                    model.id, model.address
                );
            }
            None => {
                warn!("no temperature sensor answered");
                let _ = write!(out, "Temperature sensor not found,contact professor\n\r");
            }
        }

        Self { i2c, model: found }
    }

    pub fn model(&self) -> Option<SensorModel> {
        self.model
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> TemperatureSensor for Tmp<I2C> {
    fn read(&mut self) -> Result<i16, ReadError> {
        let model = self.model.ok_or(ReadError::NotDetected)?;

        let mut rx_buf: [u8; 2] = [0; 2];
        self.i2c
            .write_read(model.address, &[model.result_reg], &mut rx_buf)
            .map_err(|err| ReadError::Bus(err.kind()))?;

        Ok(raw_to_celsius(rx_buf))
    }
}

/// Converts the big endian two's complement result register to whole degrees,
/// truncating toward zero
pub fn raw_to_celsius(raw: [u8; 2]) -> i16 {
    i16::from_be_bytes(raw) / LSB_PER_DEGREE
}
