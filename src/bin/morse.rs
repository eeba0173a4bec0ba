//! Morse code blinker: sends SOS, or OK once a button requested it.
//!
//! Dots on the red LED (PB14), dashes on the green LED (PB0). The blue user button (PC13)
//! and an external button on PF15 both flip the message request.
//!
//! This runs on a NUCLEO-F767ZI

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::{
    exti::ExtiInput,
    gpio::{Level, Output, Pull, Speed},
};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use nucleo_f767zi::cmd::ToggleLatch;
use nucleo_f767zi::config::MORSE_TICK;
use nucleo_f767zi::error::halt;
use nucleo_f767zi::led::LedPair;
use nucleo_f767zi::morse::MorseTask;
use nucleo_f767zi::tick::{EmbassyTicks, TickScheduler};

static NEXT_MESSAGE: ToggleLatch = ToggleLatch::new();

#[derive(Clone, Copy)]
enum Edge {
    Rising,
    Falling,
}

#[embassy_executor::task(pool_size = 2)]
async fn button_task(mut button: ExtiInput<'static>, edge: Edge) {
    loop {
        match edge {
            Edge::Rising => button.wait_for_rising_edge().await,
            Edge::Falling => button.wait_for_falling_edge().await,
        }
        let requested = NEXT_MESSAGE.toggle();
        info!("message request toggled, OK requested: {}", requested);
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_stm32::init(Default::default());

    info!("Morse blinker starting");

    let mut leds = LedPair::new(
        Output::new(p.PB14, Level::Low, Speed::Low),
        Output::new(p.PB0, Level::Low, Speed::Low),
    );
    leds.all_off();

    // the user button is active high, the external one pulls up and shorts to ground
    let user_button = ExtiInput::new(p.PC13, p.EXTI13, Pull::Down);
    spawner.spawn(button_task(user_button, Edge::Rising)).unwrap();
    let ext_button = ExtiInput::new(p.PF15, p.EXTI15, Pull::Up);
    spawner.spawn(button_task(ext_button, Edge::Falling)).unwrap();

    let mut scheduler =
        TickScheduler::start(EmbassyTicks::new(), MORSE_TICK).unwrap_or_else(|err| halt(err));

    // holds block inside the tick, nothing else shares this executor
    let mut blinker = MorseTask::new(leds, Delay, &NEXT_MESSAGE);
    scheduler.run(&mut blinker).await;
}
