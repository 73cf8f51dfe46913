/*
 * The pedestrian call latch.
 *
 * The button task presses, the sequencer serves. Instead of a single flag the
 * latch counts presses and remembers how many of them have been served. The
 * sequencer takes a ticket when it accepts a call at the end of vehicle green
 * and hands it back when the crossing cycle completes. Every press up to the
 * ticket is served by that one crossing. A press that arrives after the
 * ticket was taken stays pending and starts the next cycle, even when it
 * lands in the very poll that serves the current one.
 *
 * Each counter has a single writer, so plain loads and stores suffice.
 */

use core::sync::atomic::{AtomicU32, Ordering};

/// Marks how many presses a crossing cycle will serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct CallTicket(u32);

pub struct CallLatch {
    presses: AtomicU32,
    served: AtomicU32,
}

impl CallLatch {
    pub const fn new() -> Self {
        CallLatch {
            presses: AtomicU32::new(0),
            served: AtomicU32::new(0),
        }
    }

    /// Register a button press. Never clears anything.
    pub fn press(&self) {
        let presses = self.presses.load(Ordering::Relaxed);
        self.presses
            .store(presses.wrapping_add(1), Ordering::Release);
    }

    pub fn is_pending(&self) -> bool {
        self.presses.load(Ordering::Acquire) != self.served.load(Ordering::Relaxed)
    }

    /// Take a ticket covering every press registered so far.
    pub fn accept(&self) -> CallTicket {
        CallTicket(self.presses.load(Ordering::Acquire))
    }

    /// Mark the presses covered by `ticket` as served.
    pub fn serve(&self, ticket: CallTicket) {
        self.served.store(ticket.0, Ordering::Relaxed);
    }
}

impl Default for CallLatch {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_latch_is_not_pending() {
        assert!(!CallLatch::new().is_pending());
    }

    #[test]
    fn press_is_sticky() {
        let latch = CallLatch::new();
        latch.press();
        assert!(latch.is_pending());
        assert!(latch.is_pending());
    }

    #[test]
    fn accepting_does_not_clear() {
        let latch = CallLatch::new();
        latch.press();
        let _ticket = latch.accept();
        assert!(latch.is_pending());
    }

    #[test]
    fn serving_clears_every_press_before_the_ticket() {
        let latch = CallLatch::new();
        latch.press();
        latch.press();
        latch.press();
        let ticket = latch.accept();
        latch.serve(ticket);
        assert!(!latch.is_pending());
    }

    #[test]
    fn press_after_the_ticket_survives_serving() {
        let latch = CallLatch::new();
        latch.press();
        let ticket = latch.accept();
        latch.press();
        latch.serve(ticket);
        assert!(latch.is_pending());

        let next = latch.accept();
        latch.serve(next);
        assert!(!latch.is_pending());
    }

    #[test]
    fn press_counter_wraps() {
        let latch = CallLatch {
            presses: AtomicU32::new(u32::MAX),
            served: AtomicU32::new(u32::MAX),
        };
        assert!(!latch.is_pending());
        latch.press();
        assert!(latch.is_pending());
        let ticket = latch.accept();
        latch.serve(ticket);
        assert!(!latch.is_pending());
    }
}
