mod display;

pub use uom::si::f64::{Area, Force, Mass, Pressure};

pub use uom::si::{
    area::{square_foot, square_meter},
    force::{kilonewton, newton, pound_force},
    mass::{megagram as metric_ton, pound},
    pressure::{kilopascal, psi},
};

pub use display::{DisplayArea, DisplayForce, DisplayGroundBearingPressure, DisplayMass};
