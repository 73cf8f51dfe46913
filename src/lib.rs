/*
 * Controller for a single pedestrian crossing.
 *
 * Everything in this library is independent of the device: the tick counter,
 * the call latch and the light sequencer only touch shared state and return
 * the lamp vector to drive. The binary wires them to the timer, the button
 * and the GPIO pins. Keeping the hardware out means the whole sequence can be
 * exercised on the host with injected ticks and button presses.
 */

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod call;
pub mod clock;
pub mod config;
pub mod lamps;
pub mod trafficlight;

pub use call::{CallLatch, CallTicket};
pub use clock::{Clock, Elapsed};
pub use lamps::{Lamp, LightOutput};
pub use trafficlight::{Phase, PhaseLog, Sequencer, Subphase};
