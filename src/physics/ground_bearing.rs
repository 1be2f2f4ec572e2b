//! Ground bearing pressure under the governing outrigger
//!
//! # Units
//!
//! Queries and results are plain metric numbers (metres, tonnes, kN, kPa) so
//! they serialize with the field names the dataset tools expect. Arithmetic
//! runs on uom quantities in between.
//!
//! # Known limitations
//!
//! - Duplicate configuration keys resolve to the first record in dataset order.
//! - Soil capacity is not validated. Zero or negative capacity yields an
//!   infinite, NaN or negative utilisation.

use crate::dataset::*;
use crate::types::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

pub const CONFIGURATION_NOT_FOUND: &str = "Configuration not found in dataset";
pub const INVALID_PAD_DIMENSIONS: &str = "Invalid pad dimensions: bearing area must be greater than zero";

/// A ground pressure request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureQuery {
    pub crane_model: String,
    pub counterweight_t: f64,
    pub outrigger_base: String,
    pub radius_m: f64,
    pub slew_position: String,
    pub pad_width_m: f64,
    pub pad_length_m: f64,
    #[serde(rename = "soil_capacity_kPa")]
    pub soil_capacity_kpa: f64,
}

impl PressureQuery {
    pub fn key(&self) -> RecordKey {
        RecordKey {
            crane_model: self.crane_model.clone(),
            counterweight_t: self.counterweight_t,
            outrigger_base: self.outrigger_base.clone(),
            radius_m: self.radius_m,
            slew_position: self.slew_position.clone(),
        }
    }

    pub fn bearing_area(&self) -> BearingArea {
        Area::new::<square_meter>(self.pad_width_m * self.pad_length_m)
    }

    pub fn soil_capacity(&self) -> GroundBearingPressure {
        Pressure::new::<kilopascal>(self.soil_capacity_kpa)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERROR")]
    Error,
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Ok => f.write_str("OK"),
            ResultStatus::Error => f.write_str("ERROR"),
        }
    }
}

/// Outcome of a ground pressure query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureResult {
    pub status: ResultStatus,

    /// Empty when no configuration matched
    #[serde(with = "optional_label")]
    pub governing_outrigger: Option<Outrigger>,

    /// As stored in the dataset, unrounded
    pub governing_load_t: f64,

    /// 1 dp
    #[serde(rename = "governing_load_kN")]
    pub governing_load_kn: f64,

    /// 2 dp
    pub bearing_area_m2: f64,

    /// 1 dp
    #[serde(rename = "ground_pressure_kPa")]
    pub ground_pressure_kpa: f64,

    /// 1 dp
    pub utilisation_percent: f64,

    pub warnings: Vec<String>,
}

impl PressureResult {
    fn not_found() -> Self {
        Self {
            status: ResultStatus::Error,
            governing_outrigger: None,
            governing_load_t: 0.0,
            governing_load_kn: 0.0,
            bearing_area_m2: 0.0,
            ground_pressure_kpa: 0.0,
            utilisation_percent: 0.0,
            warnings: vec![CONFIGURATION_NOT_FOUND.to_string()],
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }

    /// Format results for display
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Ground Bearing Pressure: {}\n", self.status));

        if let Some(outrigger) = self.governing_outrigger {
            s.push_str(&format!(
                "\nGoverning Outrigger: {} ({})\n",
                outrigger,
                outrigger.description()
            ));
            s.push_str(&format!(
                " Governing Load: {} t, {}\n",
                self.governing_load_t,
                DisplayForce(Force::new::<kilonewton>(self.governing_load_kn))
            ));
            s.push_str(&format!(
                " Bearing Area: {}\n",
                DisplayArea(Area::new::<square_meter>(self.bearing_area_m2))
            ));
            s.push_str(&format!(
                " Ground Pressure: {}\n",
                DisplayGroundBearingPressure(Pressure::new::<kilopascal>(self.ground_pressure_kpa))
            ));
            s.push_str(&format!(" Utilisation: {:.1}%\n", self.utilisation_percent));
        }

        if !self.warnings.is_empty() {
            s.push_str("\nWarnings:\n");
            for warning in &self.warnings {
                s.push_str(&format!(" - {}\n", warning));
            }
        }
        s
    }
}

/// Resolves pressure queries against a loaded dataset.
///
/// The record set is owned and never modified, so one engine can serve
/// queries from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct PressureEngine {
    records: RecordSet,
}

impl PressureEngine {
    pub fn new(records: RecordSet) -> Self {
        for key in records.duplicate_keys() {
            tracing::warn!("Duplicate configuration {}: only the first record is used", key);
        }
        Self { records }
    }

    /// Load the dataset written by the normalizer
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RecordSetError> {
        Ok(Self::new(RecordSet::from_json_file(path)?))
    }

    pub fn record_set(&self) -> &RecordSet {
        &self.records
    }

    /// Find the governing outrigger load for a query and derive ground pressure
    pub fn evaluate(&self, query: &PressureQuery) -> PressureResult {
        let key = query.key();
        let Some(record) = self.records.find(&key) else {
            tracing::warn!("No configuration for {}", key);
            return PressureResult::not_found();
        };

        tracing::debug!(
            "Matched {}: governing {} at {} t",
            key,
            record.governing_outrigger,
            record.governing_load_t
        );
        calculate_pressure(record, query)
    }
}

/// Ground pressure for a matched record
fn calculate_pressure(record: &ConfigurationRecord, query: &PressureQuery) -> PressureResult {
    let load = tonnes_to_force(record.governing_load_t);
    let area = query.bearing_area();

    let governing_load_kn = load.get::<kilonewton>();
    let area_m2 = area.get::<square_meter>();

    let mut result = PressureResult {
        status: ResultStatus::Ok,
        governing_outrigger: Some(record.governing_outrigger),
        governing_load_t: record.governing_load_t,
        governing_load_kn: round_to(governing_load_kn, 1),
        bearing_area_m2: round_to(area_m2, 2),
        ground_pressure_kpa: 0.0,
        utilisation_percent: 0.0,
        warnings: Vec::new(),
    };

    if area_m2 <= 0.0 {
        tracing::warn!("Rejected pad {} m x {} m", query.pad_width_m, query.pad_length_m);
        result.status = ResultStatus::Error;
        result.warnings.push(INVALID_PAD_DIMENSIONS.to_string());
        return result;
    }

    let pressure = Pressure::new::<kilopascal>(governing_load_kn / area_m2);
    let utilisation = pressure.get::<kilopascal>() / query.soil_capacity().get::<kilopascal>() * 100.0;

    result.ground_pressure_kpa = round_to(pressure.get::<kilopascal>(), 1);
    result.utilisation_percent = round_to(utilisation, 1);
    result
}

/// Typical allowable soil bearing capacities, kPa.
///
/// Presumed values for preliminary checks only. Use a site investigation
/// figure when one exists.
pub mod soil_capacities {
    use crate::types::*;

    pub fn soft_clay() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(75.0)
    }

    pub fn medium_clay() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(150.0)
    }

    pub fn stiff_clay() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(300.0)
    }

    pub fn loose_sand() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(100.0)
    }

    pub fn dense_sand() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(300.0)
    }

    pub fn gravel() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(500.0)
    }

    pub fn soft_rock() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(1000.0)
    }

    pub fn hard_rock() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(4000.0)
    }

    /// Compacted hardstanding or asphalt over a granular base
    pub fn paved_surface() -> GroundBearingPressure {
        Pressure::new::<kilopascal>(200.0)
    }
}
