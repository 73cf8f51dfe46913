/*
 * The time base of the crossing.
 *
 * A periodic ticker calls `tick()` at `TICKS_PER_SECOND`. The clock folds
 * those ticks into whole seconds, which is the only unit the sequencer waits
 * in. The sequencer restarts the clock whenever it needs a fresh timing
 * window.
 *
 * The sub-second ticks and the seconds are one value behind one lock. Ticks
 * arrive while the main loop is half way through evaluating a phase, so a
 * reader must never see the ticks of one second paired with the seconds of
 * another, and a restart must clear both at once.
 */

use core::cell::Cell;

use embassy_sync::blocking_mutex::{Mutex, raw::CriticalSectionRawMutex};

use crate::config::TICKS_PER_SECOND;

/// Time since the clock was last restarted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Elapsed {
    /// Sub-second ticks, always below `TICKS_PER_SECOND`.
    pub ticks: u32,
    pub seconds: u32,
}

impl Elapsed {
    pub const ZERO: Elapsed = Elapsed {
        ticks: 0,
        seconds: 0,
    };

    /// Position in the current timing window, counted in ticks.
    pub fn window_tick(&self) -> u32 {
        self.seconds
            .saturating_mul(TICKS_PER_SECOND)
            .saturating_add(self.ticks)
    }
}

pub struct Clock {
    elapsed: Mutex<CriticalSectionRawMutex, Cell<Elapsed>>,
}

impl Clock {
    pub const fn new() -> Self {
        Clock {
            elapsed: Mutex::new(Cell::new(Elapsed::ZERO)),
        }
    }

    /// Called once per timer period. Short and non-blocking: it runs on every
    /// tick, also while the sequencer is in the middle of a poll.
    pub fn tick(&self) {
        self.elapsed.lock(|elapsed| {
            let mut now = elapsed.get();
            now.ticks += 1;
            if now.ticks >= TICKS_PER_SECOND {
                now.ticks = 0;
                now.seconds = now.seconds.saturating_add(1);
            }
            elapsed.set(now);
        });
    }

    pub fn now(&self) -> Elapsed {
        self.elapsed.lock(|elapsed| elapsed.get())
    }

    /// Start a fresh timing window: ticks and seconds both go back to zero.
    pub fn restart(&self) {
        self.elapsed.lock(|elapsed| elapsed.set(Elapsed::ZERO));
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticked(count: u32) -> Clock {
        let clock = Clock::new();
        for _ in 0..count {
            clock.tick();
        }
        clock
    }

    #[test]
    fn starts_at_zero() {
        assert_eq!(Clock::new().now(), Elapsed::ZERO);
    }

    #[test]
    fn one_tick_short_of_a_second() {
        let clock = ticked(TICKS_PER_SECOND - 1);
        assert_eq!(
            clock.now(),
            Elapsed {
                ticks: TICKS_PER_SECOND - 1,
                seconds: 0
            }
        );
    }

    #[test]
    fn sixty_four_ticks_make_one_second() {
        let clock = ticked(64);
        assert_eq!(clock.now(), Elapsed { ticks: 0, seconds: 1 });
    }

    #[test]
    fn seconds_keep_counting() {
        let clock = ticked(10 * TICKS_PER_SECOND + 5);
        assert_eq!(clock.now(), Elapsed { ticks: 5, seconds: 10 });
    }

    #[test]
    fn restart_clears_ticks_and_seconds_together() {
        let clock = ticked(3 * TICKS_PER_SECOND + 17);
        clock.restart();
        assert_eq!(clock.now(), Elapsed::ZERO);

        clock.tick();
        assert_eq!(clock.now(), Elapsed { ticks: 1, seconds: 0 });
    }

    #[test]
    fn window_tick_spans_seconds() {
        assert_eq!(Elapsed { ticks: 26, seconds: 1 }.window_tick(), 90);
        assert_eq!(Elapsed { ticks: 22, seconds: 2 }.window_tick(), 150);
        assert_eq!(
            Elapsed {
                ticks: 63,
                seconds: u32::MAX
            }
            .window_tick(),
            u32::MAX
        );
    }
}
