pub mod units;

pub use units::*;

// Type aliases for domain clarity (zero cost)
pub type Weight = Mass;
pub type LoadForce = Force;
pub type BearingArea = Area;
pub type GroundBearingPressure = Pressure;

/// Gravity used by outrigger load charts, kN per tonne.
///
/// Charts are published against 9.81, not standard gravity (9.80665), so
/// tonne-to-force conversion uses this value instead of uom's `standard_gravity`.
pub const KN_PER_TONNE: f64 = 9.81;

/// Convert a chart load in tonnes to force
#[inline]
pub fn tonnes_to_force(load_t: f64) -> LoadForce {
    Force::new::<kilonewton>(load_t * KN_PER_TONNE)
}

/// Round to a number of decimal places.
///
/// Rounds the exact decimal value of `value`, so 114.45 (stored slightly
/// above the half) goes up and 12.45 (stored slightly below) goes down.
/// Only exactly representable ties go to even.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", places, value).parse().unwrap_or(value)
}
