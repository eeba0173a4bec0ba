//! Thermostat: samples a TMP sensor, drives the heater LED and reports over UART.
//!
//! Every 200ms tick the setpoint follows the buttons, every 500ms the temperature is
//! sampled and every second the heater (red LED, PB14) is switched and a status line
//! `<temperature,setpoint,heater,seconds>` goes out on USART3 at 115200 baud.
//!
//! The blue user button (PC13) raises the setpoint, an external button on PF15 lowers it.
//! The sensor sits on I2C1 (SCL PB8, SDA PB9).
//!
//! This runs on a NUCLEO-F767ZI

#![no_std]
#![no_main]

use core::fmt::Write;

use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::i2c::{Config as I2cConfig, I2c};
use embassy_stm32::time::Hertz;
use embassy_stm32::{
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
};
use embassy_time::Instant;
use {defmt_rtt as _, panic_probe as _};

use nucleo_f767zi::cmd::{Command, CommandLatch};
use nucleo_f767zi::config::{I2C_FREQUENCY_HZ, THERMOSTAT_TICK};
use nucleo_f767zi::error::halt;
use nucleo_f767zi::setup_usart_status_console;
use nucleo_f767zi::thermostat::Thermostat;
use nucleo_f767zi::tick::{EmbassyTicks, TickScheduler};
use nucleo_f767zi::tmp::Tmp;

static PENDING_COMMAND: CommandLatch = CommandLatch::new();

#[derive(Clone, Copy)]
enum Edge {
    Rising,
    Falling,
}

#[embassy_executor::task(pool_size = 2)]
async fn button_task(mut button: ExtiInput<'static>, edge: Edge, command: Command) {
    loop {
        match edge {
            Edge::Rising => button.wait_for_rising_edge().await,
            Edge::Falling => button.wait_for_falling_edge().await,
        }
        PENDING_COMMAND.post(command);
        info!("button pressed, {} pending", command.as_str());
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());

    info!("Thermostat starting");

    let heater = Output::new(p.PB14, Level::Low, Speed::Low);

    // the user button is active high, the external one pulls up and shorts to ground
    let up_button = ExtiInput::new(p.PC13, p.EXTI13, Pull::Down);
    spawner
        .spawn(button_task(up_button, Edge::Rising, Command::Increase))
        .unwrap();
    let down_button = ExtiInput::new(p.PF15, p.EXTI15, Pull::Up);
    spawner
        .spawn(button_task(down_button, Edge::Falling, Command::Decrease))
        .unwrap();

    let mut console = setup_usart_status_console!(p).unwrap_or_else(|err| halt(err));

    let _ = write!(console, "Initializing I2C Driver - ");
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB8, // scl
        p.PB9, // sda
        Hertz(I2C_FREQUENCY_HZ),
        I2cConfig::default(),
    );
    let _ = write!(console, "Passed\n\r");
    let sensor = Tmp::discover(i2c, &mut console);

    let mut scheduler =
        TickScheduler::start(EmbassyTicks::new(), THERMOSTAT_TICK).unwrap_or_else(|err| halt(err));

    let mut thermostat = Thermostat::new(sensor, heater, console, &PENDING_COMMAND, Instant::now());
    scheduler.run(&mut thermostat).await;
}
