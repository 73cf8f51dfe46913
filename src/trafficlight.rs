/*
 * The light sequencer.
 *
 * The sequencer is polled from the main loop as often as the loop comes
 * around. It never waits: each poll looks at the clock and the call latch,
 * decides whether the current phase is over and produces the lamp vector.
 * Ticks and presses keep arriving between and during polls.
 *
 * Deciding is kept apart from doing. `evaluate` is a pure function of the
 * phase, the sub-timer, the elapsed time and the pending call. It returns a
 * `Step` that says what to show and which side effects to apply. `Sequencer`
 * applies them to the clock and the latch.
 */

use crate::call::{CallLatch, CallTicket};
use crate::clock::{Clock, Elapsed};
use crate::config::{
    ALL_STOP_SECONDS, CALL_GUARD_SECONDS, FLASH_FIRST_PATTERN_TICKS, FLASH_SECOND_PATTERN_TICKS,
    FLASHING_SECONDS, PEDESTRIAN_GREEN_SECONDS,
};
use crate::lamps::LightOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Phase {
    VehicleGreen,
    Flashing,
    VehicleRed,
    PedestrianGreen,
    PedestrianRed,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::VehicleGreen => "VehicleGreen",
            Phase::Flashing => "Flashing",
            Phase::VehicleRed => "VehicleRed",
            Phase::PedestrianGreen => "PedestrianGreen",
            Phase::PedestrianRed => "PedestrianRed",
        }
    }
}

/// Which of its two callers the flashing phase is serving. It decides both
/// the lamps that blink and where flashing exits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub enum Subphase {
    /// Set during vehicle green: blink the vehicle side, then vehicle red.
    MinVehiclePass,
    /// Set during pedestrian green: blink the pedestrian side, then
    /// pedestrian red.
    FlashingWindow,
}

/// The outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub phase: Phase,
    pub subphase: Subphase,
    /// `None` keeps the lamps as they are.
    pub output: Option<LightOutput>,
    /// Ticks and seconds both go back to zero.
    pub restart_clock: bool,
    /// The pending call is taken on; presses after this start another cycle.
    pub accept_call: bool,
    /// The accepted call is served.
    pub serve_call: bool,
}

impl Step {
    fn stay(phase: Phase, subphase: Subphase, output: Option<LightOutput>) -> Self {
        Step {
            phase,
            subphase,
            output,
            restart_clock: false,
            accept_call: false,
            serve_call: false,
        }
    }

    fn enter(self, phase: Phase) -> Self {
        Step {
            phase,
            restart_clock: true,
            ..self
        }
    }
}

/*
 * The lamps for a point in a flashing window. The pattern switches at fixed
 * window ticks and is held in between; before the first switch the lamps of
 * the previous phase stay on.
 */
fn flash_pattern(subphase: Subphase, window_tick: u32) -> Option<LightOutput> {
    let (first, second) = match subphase {
        Subphase::MinVehiclePass => (
            LightOutput::VEHICLE_FLASH_OFF,
            LightOutput::VEHICLE_FLASH_ON,
        ),
        Subphase::FlashingWindow => (
            LightOutput::PEDESTRIAN_FLASH_OFF,
            LightOutput::PEDESTRIAN_FLASH_ON,
        ),
    };

    let last_first = FLASH_FIRST_PATTERN_TICKS
        .iter()
        .copied()
        .filter(|tick| *tick <= window_tick)
        .max();
    let last_second = FLASH_SECOND_PATTERN_TICKS
        .iter()
        .copied()
        .filter(|tick| *tick <= window_tick)
        .max();

    match (last_first, last_second) {
        (None, None) => None,
        (Some(_), None) => Some(first),
        (None, Some(_)) => Some(second),
        (Some(a), Some(b)) if a > b => Some(first),
        (Some(_), Some(_)) => Some(second),
    }
}

pub fn evaluate(phase: Phase, subphase: Subphase, elapsed: Elapsed, call_pending: bool) -> Step {
    let seconds = elapsed.seconds;

    match phase {
        Phase::VehicleGreen => {
            let step = Step::stay(
                phase,
                Subphase::MinVehiclePass,
                Some(LightOutput::VEHICLE_GO),
            );
            // The guard is the call guard, not the nominal minimum pass time.
            if call_pending && seconds >= CALL_GUARD_SECONDS {
                Step {
                    accept_call: true,
                    ..step.enter(Phase::Flashing)
                }
            } else {
                step
            }
        }
        Phase::Flashing => {
            if seconds < FLASHING_SECONDS {
                Step::stay(phase, subphase, flash_pattern(subphase, elapsed.window_tick()))
            } else {
                let exit = match subphase {
                    Subphase::MinVehiclePass => Phase::VehicleRed,
                    Subphase::FlashingWindow => Phase::PedestrianRed,
                };
                Step::stay(phase, subphase, None).enter(exit)
            }
        }
        Phase::VehicleRed => {
            let step = Step::stay(phase, subphase, Some(LightOutput::ALL_STOP));
            if seconds >= ALL_STOP_SECONDS {
                step.enter(Phase::PedestrianGreen)
            } else {
                step
            }
        }
        Phase::PedestrianGreen => {
            let step = Step::stay(
                phase,
                Subphase::FlashingWindow,
                Some(LightOutput::PEDESTRIAN_GO),
            );
            if seconds >= PEDESTRIAN_GREEN_SECONDS {
                step.enter(Phase::Flashing)
            } else {
                step
            }
        }
        Phase::PedestrianRed => {
            let step = Step::stay(phase, subphase, Some(LightOutput::ALL_STOP));
            if seconds >= ALL_STOP_SECONDS {
                Step {
                    serve_call: true,
                    ..step.enter(Phase::VehicleGreen)
                }
            } else {
                step
            }
        }
    }
}

#[derive(Debug)]
pub struct Sequencer {
    phase: Phase,
    subphase: Subphase,
    output: LightOutput,
    ticket: Option<CallTicket>,
}

impl Sequencer {
    pub fn new() -> Self {
        Sequencer {
            phase: Phase::VehicleGreen,
            subphase: Subphase::MinVehiclePass,
            output: LightOutput::DARK,
            ticket: None,
        }
    }

    /*
     * Evaluate the current phase once and apply the outcome. Returns the lamp
     * vector to drive, which is the previous one when the phase holds.
     */
    pub fn poll(&mut self, clock: &Clock, calls: &CallLatch) -> LightOutput {
        let step = evaluate(self.phase, self.subphase, clock.now(), calls.is_pending());

        if let Some(output) = step.output {
            self.output = output;
        }
        if step.restart_clock {
            clock.restart();
        }
        if step.accept_call {
            let ticket = calls.accept();
            info!("pedestrian call accepted: {}", ticket);
            self.ticket = Some(ticket);
        }
        if step.serve_call {
            if let Some(ticket) = self.ticket.take() {
                calls.serve(ticket);
                info!("pedestrian call served: {}", ticket);
            }
        }
        if step.phase != self.phase {
            info!(
                "{} -> {} ({})",
                self.phase.name(),
                step.phase.name(),
                step.subphase
            );
        }

        self.phase = step.phase;
        self.subphase = step.subphase;
        self.output
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn subphase(&self) -> Subphase {
        self.subphase
    }

    pub fn output(&self) -> LightOutput {
        self.output
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Reports each phase once, on the first poll made while already in it. The
 * poll that changes the phase still returns the lamps of the phase it left,
 * so the caller records the phase before polling and hands it in here.
 */
#[derive(Debug, Default)]
pub struct PhaseLog {
    last: Option<Phase>,
}

impl PhaseLog {
    pub const fn new() -> Self {
        PhaseLog { last: None }
    }

    pub fn entered(&mut self, polled_in: Phase) -> Option<Phase> {
        if self.last == Some(polled_in) {
            None
        } else {
            self.last = Some(polled_in);
            Some(polled_in)
        }
    }
}
