/*
 * The four lamps of the crossing and the patterns the sequencer shows on them.
 *
 * A `LightOutput` is the complete desired state of the lamp lines. The
 * sequencer only ever produces the patterns named here; the device layer maps
 * each lamp to a pin.
 */

use enum_ordinalize::Ordinalize;

#[derive(Ordinalize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
#[repr(usize)]
pub enum Lamp {
    VehicleGreen,
    VehicleRed,
    PedestrianGreen,
    PedestrianRed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct LightOutput {
    lit: [bool; Lamp::VARIANT_COUNT],
}

impl LightOutput {
    pub const fn new(
        vehicle_green: bool,
        vehicle_red: bool,
        pedestrian_green: bool,
        pedestrian_red: bool,
    ) -> Self {
        LightOutput {
            lit: [vehicle_green, vehicle_red, pedestrian_green, pedestrian_red],
        }
    }

    /// Every lamp off. Only seen before the first poll.
    pub const DARK: LightOutput = LightOutput::new(false, false, false, false);

    /// Vehicles go, pedestrians wait.
    pub const VEHICLE_GO: LightOutput = LightOutput::new(true, false, false, true);

    /// Both reds at once, between the two rights of way.
    pub const ALL_STOP: LightOutput = LightOutput::new(false, true, false, true);

    /// Pedestrians go, vehicles wait.
    pub const PEDESTRIAN_GO: LightOutput = LightOutput::new(false, true, true, false);

    // The vehicle side blinks its green at the end of vehicle green...
    pub const VEHICLE_FLASH_OFF: LightOutput = LightOutput::new(false, false, false, true);
    pub const VEHICLE_FLASH_ON: LightOutput = LightOutput::VEHICLE_GO;

    // ...and the pedestrian side blinks its green at the end of the crossing.
    pub const PEDESTRIAN_FLASH_OFF: LightOutput = LightOutput::new(false, true, false, false);
    pub const PEDESTRIAN_FLASH_ON: LightOutput = LightOutput::PEDESTRIAN_GO;

    pub fn is_lit(&self, lamp: Lamp) -> bool {
        self.lit[lamp.ordinal()]
    }

    /// Vehicles and pedestrians are never both shown green.
    pub fn is_conflict_free(&self) -> bool {
        !(self.is_lit(Lamp::VehicleGreen) && self.is_lit(Lamp::PedestrianGreen))
    }
}
