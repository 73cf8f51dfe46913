//! Fixed timing of the crossing.
//!
//! All durations are whole seconds as counted by [`crate::Clock`]. The tick
//! rate and the ticker frequency in the firmware are the same constant;
//! changing one without the other silently changes every real-world timing.

/// Timer ticks per elapsed second. The ticker runs at this rate.
pub const TICKS_PER_SECOND: u32 = 64;

/// Seconds of vehicle green before a pending call is honoured.
pub const CALL_GUARD_SECONDS: u32 = 10;

/// The minimum vehicle pass time the crossing is nominally designed for. The
/// call guard above is what is actually enforced and is deliberately larger.
pub const MIN_VEHICLE_PASS_SECONDS: u32 = 5;

/// Length of a flashing warning window.
pub const FLASHING_SECONDS: u32 = 3;

/// All-stop interval between vehicle and pedestrian right of way.
pub const ALL_STOP_SECONDS: u32 = 1;

/// Pedestrian green.
pub const PEDESTRIAN_GREEN_SECONDS: u32 = 10;

/// Window ticks at which the flashing lamps switch to the first pattern.
pub const FLASH_FIRST_PATTERN_TICKS: [u32; 3] = [30, 90, 150];

/// Window ticks at which the flashing lamps switch to the second pattern.
pub const FLASH_SECOND_PATTERN_TICKS: [u32; 2] = [60, 120];
