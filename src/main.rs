#![cfg_attr(target_os = "none", no_std)]
#![cfg_attr(target_os = "none", no_main)]

// https://dev.to/theembeddedrustacean/embedded-rust-embassy-gpio-button-controlled-blinking-3ee6
// https://www.youtube.com/watch?v=dab_vzVDr_M

#[cfg(target_os = "none")]
mod io;

#[cfg(target_os = "none")]
use defmt_rtt as _;
#[cfg(target_os = "none")]
use embassy_executor::Spawner;
#[cfg(target_os = "none")]
use embassy_futures::yield_now;
#[cfg(target_os = "none")]
use embassy_stm32::exti::ExtiInput;
#[cfg(target_os = "none")]
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
#[cfg(target_os = "none")]
use embassy_stm32::usart::{Config, Uart};
#[cfg(target_os = "none")]
use embassy_stm32::{bind_interrupts, peripherals, usart};
#[cfg(target_os = "none")]
use panic_halt as _;

#[cfg(target_os = "none")]
use crate::io::{ANNOUNCEMENTS, Lamps, announce_task, call_task, tick_task};
#[cfg(target_os = "none")]
use pedestrian_crossing::{CallLatch, Clock, LightOutput, PhaseLog, Sequencer};

#[cfg(target_os = "none")]
static CLOCK: Clock = Clock::new();
#[cfg(target_os = "none")]
static CALLS: CallLatch = CallLatch::new();

#[cfg(target_os = "none")]
bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<peripherals::USART1>;
});

#[cfg(target_os = "none")]
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let peripherals = embassy_stm32::init(Default::default());

    let usart = Uart::new(
        peripherals.USART1,
        peripherals.PA10,
        peripherals.PA9,
        Irqs,
        peripherals.DMA1_CH4,
        peripherals.DMA1_CH5,
        Config::default(), // 115200 baud
    )
    .unwrap();

    let mut lamps = Lamps::new(
        Output::new(peripherals.PB14, Level::Low, Speed::Low),
        Output::new(peripherals.PB10, Level::Low, Speed::Low),
        Output::new(peripherals.PB9, Level::Low, Speed::Low),
        Output::new(peripherals.PB7, Level::Low, Speed::Low),
    );

    let button = ExtiInput::new(peripherals.PE11, peripherals.EXTI11, Pull::Up);

    spawner.spawn(tick_task(&CLOCK)).unwrap();
    spawner.spawn(call_task(button, &CALLS)).unwrap();
    spawner
        .spawn(announce_task(usart, ANNOUNCEMENTS.receiver()))
        .unwrap();
    defmt::info!("crossing started");

    let mut sequencer = Sequencer::new();
    let mut shown = LightOutput::DARK;
    let mut phases = PhaseLog::new();

    loop {
        let polled_in = sequencer.phase();
        let output = sequencer.poll(&CLOCK, &CALLS);
        if output != shown {
            lamps.show(&output);
            shown = output;
        }

        // The serial line is slow; never wait for it here.
        if let Some(phase) = phases.entered(polled_in) {
            if ANNOUNCEMENTS.try_send(phase).is_err() {
                defmt::warn!("announcement of {} dropped", phase);
            }
        }

        // Let the ticker and the button run before evaluating again.
        yield_now().await;
    }
}

/*
 * On the host there is no hardware: run one pedestrian crossing with
 * simulated ticks and print each phase with the lamps it shows.
 */
#[cfg(not(target_os = "none"))]
fn main() {
    use pedestrian_crossing::Lamp;
    use pedestrian_crossing::config::TICKS_PER_SECOND;

    for (tick, phase, output) in simulate_crossing(30) {
        let lit: Vec<&str> = [
            (Lamp::VehicleGreen, "vehicle-green"),
            (Lamp::VehicleRed, "vehicle-red"),
            (Lamp::PedestrianGreen, "pedestrian-green"),
            (Lamp::PedestrianRed, "pedestrian-red"),
        ]
        .into_iter()
        .filter(|(lamp, _)| output.is_lit(*lamp))
        .map(|(_, name)| name)
        .collect();
        println!(
            "{:>6.2}s phase: {:<16} {}",
            tick as f32 / TICKS_PER_SECOND as f32,
            phase.name(),
            lit.join(" ")
        );
    }
}

/// Press the button at power-up and run for `seconds`. Returns the tick,
/// phase and lamps of the first poll made in every phase entered.
#[cfg(not(target_os = "none"))]
fn simulate_crossing(
    seconds: u32,
) -> Vec<(u32, pedestrian_crossing::Phase, pedestrian_crossing::LightOutput)> {
    use pedestrian_crossing::config::TICKS_PER_SECOND;
    use pedestrian_crossing::{CallLatch, Clock, PhaseLog, Sequencer};

    let clock = Clock::new();
    let calls = CallLatch::new();
    let mut sequencer = Sequencer::new();
    let mut phases = PhaseLog::new();
    let mut entries = Vec::new();

    calls.press();
    for tick in 0..(seconds * TICKS_PER_SECOND) {
        let polled_in = sequencer.phase();
        let output = sequencer.poll(&clock, &calls);
        if let Some(phase) = phases.entered(polled_in) {
            entries.push((tick, phase, output));
        }
        clock.tick();
    }
    entries
}

#[cfg(all(test, not(target_os = "none")))]
mod tests {
    use super::*;
    use pedestrian_crossing::{Lamp, LightOutput, Phase};

    #[test]
    fn simulation_prints_the_lamps_of_the_phase_it_names() {
        let entries = simulate_crossing(30);
        let phases: Vec<Phase> = entries.iter().map(|(_, phase, _)| *phase).collect();
        assert_eq!(
            phases,
            [
                Phase::VehicleGreen,
                Phase::Flashing,
                Phase::VehicleRed,
                Phase::PedestrianGreen,
                Phase::Flashing,
                Phase::PedestrianRed,
                Phase::VehicleGreen,
            ]
        );

        for (tick, phase, output) in entries {
            match phase {
                Phase::VehicleGreen => assert_eq!(output, LightOutput::VEHICLE_GO, "{tick}"),
                Phase::VehicleRed | Phase::PedestrianRed => {
                    assert_eq!(output, LightOutput::ALL_STOP, "{tick}")
                }
                Phase::PedestrianGreen => {
                    assert_eq!(output, LightOutput::PEDESTRIAN_GO, "{tick}")
                }
                Phase::Flashing => assert!(output.is_conflict_free()),
            }
        }
    }

    #[test]
    fn simulation_shows_pedestrian_green_after_vehicle_red() {
        let entries = simulate_crossing(30);
        let (tick, _, output) = entries
            .iter()
            .find(|(_, phase, _)| *phase == Phase::PedestrianGreen)
            .copied()
            .unwrap();
        // 10 s guard, 3 s flashing, 1 s all-stop, then the first poll in it.
        assert_eq!(tick, 14 * 64 + 1);
        assert!(output.is_lit(Lamp::PedestrianGreen));
        assert!(!output.is_lit(Lamp::PedestrianRed));
    }
}
