use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four outriggers of a mobile crane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outrigger {
    #[serde(rename = "FL")]
    FrontLeft,
    #[serde(rename = "FR")]
    FrontRight,
    #[serde(rename = "RL")]
    RearLeft,
    #[serde(rename = "RR")]
    RearRight,
}

impl Outrigger {
    /// Fixed outrigger order. Governing-load ties resolve to the earliest entry.
    pub const ALL: [Outrigger; 4] = [
        Outrigger::FrontLeft,
        Outrigger::FrontRight,
        Outrigger::RearLeft,
        Outrigger::RearRight,
    ];

    /// Short label used in datasets and results
    pub fn label(self) -> &'static str {
        match self {
            Outrigger::FrontLeft => "FL",
            Outrigger::FrontRight => "FR",
            Outrigger::RearLeft => "RL",
            Outrigger::RearRight => "RR",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Outrigger::FrontLeft => "front-left",
            Outrigger::FrontRight => "front-right",
            Outrigger::RearLeft => "rear-left",
            Outrigger::RearRight => "rear-right",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.label() == label)
    }
}

impl fmt::Display for Outrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown outrigger label: {0}")]
pub struct UnknownOutrigger(pub String);

impl FromStr for Outrigger {
    type Err = UnknownOutrigger;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s.trim()).ok_or_else(|| UnknownOutrigger(s.to_string()))
    }
}

/// Serde helper for an optional outrigger written as a label, empty when absent
pub mod optional_label {
    use super::Outrigger;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Outrigger>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map(Outrigger::label).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Outrigger>, D::Error> {
        let label = String::deserialize(deserializer)?;
        if label.is_empty() {
            return Ok(None);
        }
        label.parse().map(Some).map_err(<D::Error as serde::de::Error>::custom)
    }
}

/// Raw per-outrigger loads for one lift case, in tonnes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutriggerLoads {
    pub front_left: f64,
    pub front_right: f64,
    pub rear_left: f64,
    pub rear_right: f64,
}

impl OutriggerLoads {
    pub fn new(front_left: f64, front_right: f64, rear_left: f64, rear_right: f64) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }

    pub fn get(&self, outrigger: Outrigger) -> f64 {
        match outrigger {
            Outrigger::FrontLeft => self.front_left,
            Outrigger::FrontRight => self.front_right,
            Outrigger::RearLeft => self.rear_left,
            Outrigger::RearRight => self.rear_right,
        }
    }

    /// Most loaded outrigger and its load.
    ///
    /// Scans in [`Outrigger::ALL`] order and only replaces the current
    /// maximum on a strictly greater load, so ties keep the earlier outrigger.
    pub fn governing(&self) -> (Outrigger, f64) {
        let first = Outrigger::ALL[0];
        Outrigger::ALL[1..]
            .iter()
            .fold((first, self.get(first)), |(best, best_load), &candidate| {
                let load = self.get(candidate);
                if load > best_load {
                    (candidate, load)
                } else {
                    (best, best_load)
                }
            })
    }
}

/// Lookup key for a configuration record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordKey {
    pub crane_model: String,
    pub counterweight_t: f64,
    pub outrigger_base: String,
    pub radius_m: f64,
    pub slew_position: String,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} t / {} / {} m / {}",
            self.crane_model, self.counterweight_t, self.outrigger_base, self.radius_m, self.slew_position
        )
    }
}

/// A single load case from the outrigger load tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub crane_model: String,
    pub counterweight_t: f64,
    pub outrigger_base: String,
    pub radius_m: f64,
    pub slew_position: String,
    pub governing_outrigger: Outrigger,
    pub governing_load_t: f64,
}

impl ConfigurationRecord {
    /// Build a record, deriving the governing outrigger from the raw loads
    pub fn from_loads(
        crane_model: impl Into<String>,
        counterweight_t: f64,
        outrigger_base: impl Into<String>,
        radius_m: f64,
        slew_position: impl Into<String>,
        loads: &OutriggerLoads,
    ) -> Self {
        let (governing_outrigger, governing_load_t) = loads.governing();
        Self {
            crane_model: crane_model.into(),
            counterweight_t,
            outrigger_base: outrigger_base.into(),
            radius_m,
            slew_position: slew_position.into(),
            governing_outrigger,
            governing_load_t,
        }
    }

    pub fn key(&self) -> RecordKey {
        RecordKey {
            crane_model: self.crane_model.clone(),
            counterweight_t: self.counterweight_t,
            outrigger_base: self.outrigger_base.clone(),
            radius_m: self.radius_m,
            slew_position: self.slew_position.clone(),
        }
    }

    /// Exact match on all five key fields. Numbers compare by value.
    pub fn matches_key(&self, key: &RecordKey) -> bool {
        self.crane_model == key.crane_model
            && self.counterweight_t == key.counterweight_t
            && self.outrigger_base == key.outrigger_base
            && self.radius_m == key.radius_m
            && self.slew_position == key.slew_position
    }
}
