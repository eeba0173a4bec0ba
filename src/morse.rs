//! Morse code blinker: a two state machine cycling through SOS and OK.
//!
//! Every tick emits one symbol of the current message. A dot lights channel A for
//! [DOT_HOLD], a dash lights channel B for [DASH_HOLD], a space only pauses. After each
//! symbol the machine pauses for [SYMBOL_PAUSE]; after the last one of a message it
//! pauses for [WORD_PAUSE] and picks the next message from the toggle request.
//!
//! The machine itself is pure. [MorseMachine::tick] returns the [Step]s for one tick and
//! [play] applies them with a blocking delay, so the holds happen inside the tick.

use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use heapless::Vec;

use crate::cmd::ToggleLatch;
use crate::config::{DASH_HOLD, DOT_HOLD, SYMBOL_PAUSE, WORD_PAUSE};
use crate::led::{Channel, DigitalOutput};
use crate::tick::TickTask;

pub const SOS: &str = "... --- ...";
pub const OK: &str = "--- -.-";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    SendingSos,
    SendingOk,
}

impl State {
    pub fn message(&self) -> &'static str {
        match self {
            State::SendingSos => SOS,
            State::SendingOk => OK,
        }
    }

    /// Transition taken when a message completes.
    ///
    /// The toggle request is read as a level: while it is set OK is preferred, while
    /// it is clear SOS is preferred. A press therefore does not alternate messages, it
    /// selects one until the next press.
    pub fn next(self, toggle_requested: bool) -> State {
        match (self, toggle_requested) {
            (State::SendingSos, true) => State::SendingOk,
            (State::SendingSos, false) => State::SendingSos,
            (State::SendingOk, false) => State::SendingSos,
            (State::SendingOk, true) => State::SendingOk,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
    Gap,
}

impl Symbol {
    fn from_char(c: u8) -> Symbol {
        match c {
            b'.' => Symbol::Dot,
            b'-' => Symbol::Dash,
            _ => Symbol::Gap,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Set(Channel, bool),
    Hold(Duration),
}

/// Steps of a single tick: at most assert, hold, deassert, symbol pause, word pause
pub type Steps = Vec<Step, 5>;

pub struct MorseMachine {
    state: State,
    symbol_index: usize,
}

impl MorseMachine {
    pub const fn new() -> Self {
        Self {
            state: State::SendingSos,
            symbol_index: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn symbol_index(&self) -> usize {
        self.symbol_index
    }

    /// True between the tick that emitted the last symbol and [MorseMachine::finish_message]
    pub fn is_complete(&self) -> bool {
        self.symbol_index >= self.state.message().len()
    }

    /// Emits the current symbol and advances. When that was the last symbol the
    /// inter-word pause is appended and the machine waits for
    /// [MorseMachine::finish_message].
    pub fn tick(&mut self) -> Steps {
        let mut steps = Steps::new();
        if self.is_complete() {
            return steps;
        }

        let message = self.state.message().as_bytes();
        // capacity is sized for the longest tick, pushes cannot fail
        let _ = match Symbol::from_char(message[self.symbol_index]) {
            Symbol::Dot => steps.extend_from_slice(&[
                Step::Set(Channel::A, true),
                Step::Hold(DOT_HOLD),
                Step::Set(Channel::A, false),
            ]),
            Symbol::Dash => steps.extend_from_slice(&[
                Step::Set(Channel::B, true),
                Step::Hold(DASH_HOLD),
                Step::Set(Channel::B, false),
            ]),
            Symbol::Gap => Ok(()),
        };
        self.symbol_index += 1;
        let _ = steps.push(Step::Hold(SYMBOL_PAUSE));

        if self.is_complete() {
            let _ = steps.push(Step::Hold(WORD_PAUSE));
        }
        steps
    }

    /// Picks the next message and rewinds to its first symbol
    pub fn finish_message(&mut self, toggle_requested: bool) -> State {
        let next = self.state.next(toggle_requested);
        if next != self.state {
            debug!("switching message to {}", next.message());
        }
        self.state = next;
        self.symbol_index = 0;
        next
    }
}

impl Default for MorseMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies `steps` in order, blocking on every hold
pub fn play<O: DigitalOutput, D: DelayNs>(steps: &[Step], out: &mut O, delay: &mut D) {
    for step in steps {
        match *step {
            Step::Set(channel, on) => out.set(channel, on),
            Step::Hold(duration) => {
                delay.delay_us(u32::try_from(duration.as_micros()).unwrap_or(u32::MAX))
            }
        }
    }
}

/// The blinker as a tick task
pub struct MorseTask<'a, O, D> {
    machine: MorseMachine,
    leds: O,
    delay: D,
    toggle: &'a ToggleLatch,
}

impl<'a, O: DigitalOutput, D: DelayNs> MorseTask<'a, O, D> {
    pub fn new(leds: O, delay: D, toggle: &'a ToggleLatch) -> Self {
        Self {
            machine: MorseMachine::new(),
            leds,
            delay,
            toggle,
        }
    }

    pub fn machine(&self) -> &MorseMachine {
        &self.machine
    }

    pub fn leds(&self) -> &O {
        &self.leds
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }
}

impl<O: DigitalOutput, D: DelayNs> TickTask for MorseTask<'_, O, D> {
    fn on_tick(&mut self, _now: Instant) {
        let steps = self.machine.tick();
        play(&steps, &mut self.leds, &mut self.delay);

        // the request is sampled after the word pause, presses during it still count
        if self.machine.is_complete() {
            self.machine.finish_message(self.toggle.is_requested());
        }
    }
}
