//! Hardware agnostic control for the two LED output channels.
//!
//! [LedPair] owns two [OutputPin]s and addresses them by [Channel] for the Morse
//! blinker. The thermostat drives the channel A LED alone through an [Indicator].

use embedded_hal::digital::OutputPin;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// red LED, dots and the heater indicator
    A,

    /// green LED, dashes
    B,
}

/// Something that can switch a binary output channel
pub trait DigitalOutput {
    fn set(&mut self, channel: Channel, on: bool);
}

pub struct LedPair<A, B> {
    a: A,
    b: B,
}

impl<A: OutputPin, B: OutputPin> LedPair<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    pub fn all_off(&mut self) {
        self.set(Channel::A, false);
        self.set(Channel::B, false);
    }

    pub fn release(self) -> (A, B) {
        (self.a, self.b)
    }
}

impl<A: OutputPin, B: OutputPin> DigitalOutput for LedPair<A, B> {
    fn set(&mut self, channel: Channel, on: bool) {
        // GPIO writes on this board cannot fail, a failing mock pin is ignored the same way
        match channel {
            Channel::A => {
                let _ = led_update_simple(&mut self.a, on);
            }
            Channel::B => {
                let _ = led_update_simple(&mut self.b, on);
            }
        }
    }
}

/// A single LED used as an indicator, the thermostat's heater LED
pub struct Indicator<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> Indicator<P> {
    pub fn new(mut pin: P, on: bool) -> Self {
        let _ = led_update_simple(&mut pin, on);
        Self { pin, on }
    }

    pub fn set(&mut self, on: bool) {
        if on != self.on {
            let _ = led_update_simple(&mut self.pin, on);
            self.on = on;
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn release(self) -> P {
        self.pin
    }
}

fn led_update_simple<P: OutputPin>(led_out: &mut P, on: bool) -> Result<(), P::Error> {
    if on {
        led_out.set_high()
    } else {
        led_out.set_low()
    }
}
