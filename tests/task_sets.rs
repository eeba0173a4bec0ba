//! Both task sets driven by the scheduler against simulated time.

use embassy_futures::join::join;
use embassy_futures::{block_on, yield_now};
use embassy_time::{Duration, Instant};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTransaction};
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

use nucleo_f767zi::cmd::{Command, CommandLatch, ToggleLatch};
use nucleo_f767zi::config::{MORSE_TICK, THERMOSTAT_TICK};
use nucleo_f767zi::led::{Channel, DigitalOutput};
use nucleo_f767zi::morse::{MorseTask, State as MorseState};
use nucleo_f767zi::thermostat::Thermostat;
use nucleo_f767zi::tick::{SimulatedTicks, TickScheduler};
use nucleo_f767zi::tmp::{Tmp, TMP116_ADDR, TMP11X_ADDR};

#[derive(Default)]
struct RecordingLeds {
    switched: Vec<(Channel, bool)>,
}

impl RecordingLeds {
    fn lit(&self, channel: Channel) -> usize {
        self.switched
            .iter()
            .filter(|s| **s == (channel, true))
            .count()
    }
}

impl DigitalOutput for RecordingLeds {
    fn set(&mut self, channel: Channel, on: bool) {
        self.switched.push((channel, on));
    }
}

#[derive(Default)]
struct VirtualDelay {
    total_ns: u64,
}

impl DelayNs for VirtualDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

#[test]
fn morse_sends_sos_then_switches_to_ok_on_request() {
    let toggle = ToggleLatch::new();
    let mut scheduler =
        TickScheduler::start(SimulatedTicks::new(Instant::from_ticks(0)), MORSE_TICK).unwrap();
    let mut blinker = MorseTask::new(RecordingLeds::default(), VirtualDelay::default(), &toggle);

    // pressed while SOS is still being sent, the message is finished first
    toggle.toggle();
    block_on(scheduler.run_for(&mut blinker, 11));

    assert_eq!(blinker.leds().lit(Channel::A), 6);
    assert_eq!(blinker.leds().lit(Channel::B), 3);
    assert_eq!(blinker.machine().state(), MorseState::SendingOk);
    assert_eq!(blinker.machine().symbol_index(), 0);
    // 6 dots, 3 dashes, 11 symbol pauses and the word pause
    assert_eq!(
        blinker.delay().total_ns,
        Duration::from_millis(6 * 500 + 3 * 1500 + 11 * 500 + 3500).as_micros() * 1_000
    );

    block_on(scheduler.run_for(&mut blinker, 7));
    assert_eq!(blinker.leds().lit(Channel::A), 6 + 1);
    assert_eq!(blinker.leds().lit(Channel::B), 3 + 5);
    // still requested, OK repeats
    assert_eq!(blinker.machine().state(), MorseState::SendingOk);

    assert_eq!(scheduler.ticks(), 18);
    assert_eq!(scheduler.overruns(), 0);
}

#[test]
fn button_press_lands_while_ticks_fire_back_to_back() {
    let toggle = ToggleLatch::new();
    let mut scheduler =
        TickScheduler::start(SimulatedTicks::new(Instant::from_ticks(0)), MORSE_TICK).unwrap();
    let mut blinker = MorseTask::new(RecordingLeds::default(), VirtualDelay::default(), &toggle);

    // every tick of the simulated source is ready at once, like a Ticker that fell behind
    let press = async {
        yield_now().await;
        toggle.toggle();
    };
    block_on(join(scheduler.run_for(&mut blinker, 11), press));

    assert_eq!(blinker.leds().lit(Channel::A), 6);
    assert_eq!(blinker.machine().state(), MorseState::SendingOk);
}

#[test]
fn morse_returns_to_sos_once_request_is_cleared() {
    let toggle = ToggleLatch::new();
    let mut scheduler =
        TickScheduler::start(SimulatedTicks::new(Instant::from_ticks(0)), MORSE_TICK).unwrap();
    let mut blinker = MorseTask::new(RecordingLeds::default(), VirtualDelay::default(), &toggle);

    toggle.toggle();
    block_on(scheduler.run_for(&mut blinker, 11));
    assert_eq!(blinker.machine().state(), MorseState::SendingOk);

    toggle.toggle();
    block_on(scheduler.run_for(&mut blinker, 7));
    assert_eq!(blinker.machine().state(), MorseState::SendingSos);
}

#[test]
fn thermostat_heats_and_reports_every_second() {
    // 20 °C in the TMP result register
    let reading = vec![0x0A, 0x00];
    let i2c = I2cMock::new(&[
        I2cTransaction::write(TMP11X_ADDR, vec![0x00]).with_error(ErrorKind::Other),
        I2cTransaction::write(TMP116_ADDR, vec![0x00]),
        I2cTransaction::write_read(TMP116_ADDR, vec![0x00], reading.clone()),
        I2cTransaction::write_read(TMP116_ADDR, vec![0x00], reading.clone()),
        I2cTransaction::write_read(TMP116_ADDR, vec![0x00], reading),
    ]);
    let heater = PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]);

    let mut console = String::new();
    let sensor = Tmp::discover(i2c, &mut console);
    console.clear();

    let commands = CommandLatch::new();
    commands.post(Command::Increase);

    let start = Instant::from_ticks(0);
    let mut scheduler =
        TickScheduler::start(SimulatedTicks::new(start), THERMOSTAT_TICK).unwrap();
    let mut thermostat = Thermostat::new(sensor, heater, console, &commands, start);

    // 2s of ticks: samples at 0.6, 1.2 and 1.8s, reports at 1.0 and 2.0s
    block_on(scheduler.run_for(&mut thermostat, 10));

    assert_eq!(thermostat.session().setpoint, 31);
    assert_eq!(thermostat.session().temperature, 20);
    assert!(thermostat.heater().is_on());
    assert_eq!(thermostat.out(), "<20,31,1,0001>\n\r<20,31,1,0002>\n\r");

    let (sensor, mut heater, _) = thermostat.release();
    sensor.release().done();
    heater.done();
}

#[test]
fn thermostat_without_sensor_keeps_reporting() {
    let i2c = I2cMock::new(&[
        I2cTransaction::write(0x48, vec![0x00]).with_error(ErrorKind::Other),
        I2cTransaction::write(0x49, vec![0x00]).with_error(ErrorKind::Other),
        I2cTransaction::write(0x41, vec![0x01]).with_error(ErrorKind::Other),
    ]);
    let heater = PinMock::new(&[
        PinTransaction::set(State::Low),
        PinTransaction::set(State::High),
    ]);

    let mut console = String::new();
    let sensor = Tmp::discover(i2c, &mut console);
    assert!(console.ends_with("Temperature sensor not found,contact professor\n\r"));
    console.clear();

    let commands = CommandLatch::new();
    let start = Instant::from_ticks(0);
    let mut scheduler =
        TickScheduler::start(SimulatedTicks::new(start), THERMOSTAT_TICK).unwrap();
    let mut thermostat = Thermostat::new(sensor, heater, console, &commands, start);

    block_on(scheduler.run_for(&mut thermostat, 5));

    // one failed sample at 0.6s, then the first report with the initial temperature
    assert_eq!(
        thermostat.out(),
        "Error reading temperature sensor(no temperature sensor detected)\n\r\
         Please power cycle your board by unplugging USB and plugging back in.\n\r\
         <00,30,1,0001>\n\r"
    );

    let (sensor, mut heater, _) = thermostat.release();
    sensor.release().done();
    heater.done();
}
