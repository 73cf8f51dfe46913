/*
 * The I/O module for the crossing.
 *
 * This is the only part of the program that is device-specific. It holds the
 * two event producers, a ticker that feeds the clock and a watcher on the call
 * button, plus the driver that puts a lamp vector on the output pins and the
 * task that announces phases on the serial line.
 *
 * The producers only touch the shared clock and call latch. The main loop
 * picks up their effect on its next poll. Announcements go the other way,
 * through a channel, so the main loop never waits for the UART.
 */

use embassy_stm32::{
    exti::ExtiInput,
    gpio::{Level, Output},
    mode::Async,
    usart::Uart,
};
use embassy_sync::{
    blocking_mutex::raw::ThreadModeRawMutex,
    channel::{Channel, Receiver},
};
use embassy_time::{Duration, Ticker};
use enum_ordinalize::Ordinalize;
use pedestrian_crossing::{CallLatch, Clock, Lamp, LightOutput, Phase, config::TICKS_PER_SECOND};

pub const CHANNEL_CAPACITY: usize = 4;

pub static ANNOUNCEMENTS: Channel<ThreadModeRawMutex, Phase, CHANNEL_CAPACITY> = Channel::new();

#[embassy_executor::task]
pub async fn tick_task(clock: &'static Clock) -> ! {
    let mut ticker = Ticker::every(Duration::from_hz(TICKS_PER_SECOND as u64));

    loop {
        ticker.next().await;
        clock.tick();
    }
}

// Every falling edge is a press. There is no debounce: a bouncing contact
// registers a few presses, and those are all served by the same crossing.
#[embassy_executor::task]
pub async fn call_task(mut button: ExtiInput<'static>, calls: &'static CallLatch) -> ! {
    loop {
        button.wait_for_falling_edge().await;
        calls.press();
        defmt::debug!("call button pressed");
    }
}

#[embassy_executor::task]
pub async fn announce_task(
    mut usart: Uart<'static, Async>,
    phases: Receiver<'static, ThreadModeRawMutex, Phase, CHANNEL_CAPACITY>,
) -> ! {
    loop {
        let phase = phases.receive().await;
        for part in [b"phase: ".as_slice(), phase.name().as_bytes(), b"\n"] {
            if usart.write(part).await.is_err() {
                defmt::warn!("serial write failed for phase {}", phase);
                break;
            }
        }
    }
}

pub struct Lamps {
    outputs: [Output<'static>; Lamp::VARIANT_COUNT],
}

impl Lamps {
    pub fn new(
        vehicle_green: Output<'static>,
        vehicle_red: Output<'static>,
        pedestrian_green: Output<'static>,
        pedestrian_red: Output<'static>,
    ) -> Self {
        Lamps {
            outputs: [vehicle_green, vehicle_red, pedestrian_green, pedestrian_red],
        }
    }

    pub fn show(&mut self, output: &LightOutput) {
        for lamp in Lamp::VARIANTS {
            light(&mut self.outputs[lamp.ordinal()], output.is_lit(*lamp));
        }
    }
}

// The lamp drivers are active-high, so the sequencer can just use `true` for
// on.
fn light(output: &mut Output, on: bool) {
    output.set_level(if on { Level::High } else { Level::Low });
}
