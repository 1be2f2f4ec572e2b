use std::fmt;

use crate::types::units::*;

#[derive(Debug)]
pub struct DisplayForce(pub Force);
#[derive(Debug)]
pub struct DisplayMass(pub Mass);
#[derive(Debug)]
pub struct DisplayArea(pub Area);
#[derive(Debug)]
pub struct DisplayGroundBearingPressure(pub Pressure);

impl fmt::Display for DisplayForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kn = self.0.get::<kilonewton>();
        let lbf = self.0.get::<pound_force>();
        write!(f, "{:.1} kN ({:.0} lbf)", kn, lbf)
    }
}

impl fmt::Display for DisplayMass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tonnes = self.0.get::<metric_ton>();
        let lbs = self.0.get::<pound>();
        write!(f, "{:.2} t ({:.0} lbs)", tonnes, lbs)
    }
}

impl fmt::Display for DisplayArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m2 = self.0.get::<square_meter>();
        let ft2 = self.0.get::<square_foot>();
        write!(f, "{:.2} m² ({:.1} sq ft)", m2, ft2)
    }
}

impl fmt::Display for DisplayGroundBearingPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kpa = self.0.get::<kilopascal>();
        let psi_f64 = self.0.get::<psi>();
        write!(f, "{:.1} kPa ({:.1} psi)", kpa, psi_f64)
    }
}
