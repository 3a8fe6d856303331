//! Diurnal energy model used to tag time slots.

mod curve;

pub use curve::{EnergyCurve, EnergyLevel, EnergyWindow};
