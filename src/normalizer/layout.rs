use crate::dataset::Outrigger;
use serde::{Deserialize, Serialize};

/// Markers and column names of the outrigger load tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    /// Prefix of a first cell that opens a new outrigger base section
    pub section_marker: String,

    /// First cell of a column-header row
    pub header_sentinel: String,

    pub radius: String,
    pub slew_position: String,
    pub front_left: String,
    pub front_right: String,
    pub rear_left: String,
    pub rear_right: String,
}

impl ColumnLayout {
    /// Column holding the load of an outrigger
    pub fn load_column(&self, outrigger: Outrigger) -> &str {
        match outrigger {
            Outrigger::FrontLeft => &self.front_left,
            Outrigger::FrontRight => &self.front_right,
            Outrigger::RearLeft => &self.rear_left,
            Outrigger::RearRight => &self.rear_right,
        }
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            section_marker: "Outrigger base:".into(),
            header_sentinel: "Counterweight_t".into(),
            radius: "Radius_m".into(),
            slew_position: "Slew_position".into(),
            front_left: "FL_t".into(),
            front_right: "FR_t".into(),
            rear_left: "RL_t".into(),
            rear_right: "RR_t".into(),
        }
    }
}
