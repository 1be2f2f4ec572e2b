use crate::dataset::record::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Error types for record set persistence
#[derive(Debug, thiserror::Error)]
pub enum RecordSetError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to persist dataset: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

/// Ordered collection of configuration records.
///
/// Keys are not unique by construction. Lookups return the first match in
/// record order, so a later duplicate is never reachable. That is a known
/// limitation of the source tables; [`RecordSet::duplicate_keys`] reports
/// affected keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<ConfigurationRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<ConfigurationRecord>) -> Self {
        Self { records }
    }

    /// Load from a JSON array of records
    pub fn from_json_str(json: &str) -> Result<Self, RecordSetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RecordSetError> {
        let json = fs::read_to_string(path.as_ref())?;
        let records = Self::from_json_str(&json)?;
        tracing::info!(
            "Loaded {} records from {}",
            records.len(),
            path.as_ref().display()
        );
        Ok(records)
    }

    /// Save to a JSON file.
    ///
    /// Writes to a temporary file next to the destination and renames it into
    /// place, so an interrupted run leaves any previous dataset untouched.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), RecordSetError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_string_pretty(self)?;
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(json.as_bytes())?;
        file.persist(path)?;

        tracing::info!("Wrote {} records to {}", self.len(), path.display());
        Ok(())
    }

    pub fn records(&self) -> &[ConfigurationRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigurationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record matching the key, in record order
    pub fn find(&self, key: &RecordKey) -> Option<&ConfigurationRecord> {
        self.records.iter().find(|record| record.matches_key(key))
    }

    /// Keys that occur more than once, in order of first appearance
    pub fn duplicate_keys(&self) -> Vec<RecordKey> {
        let mut counts: HashMap<HashableKey<'_>, usize> = HashMap::new();
        let mut order = Vec::new();

        for record in &self.records {
            let hashed = HashableKey::from(record);
            let count = counts.entry(hashed).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(record.key());
            }
        }
        order
    }

    /// Crane models present in the dataset
    pub fn crane_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.records.iter().map(|r| r.crane_model.clone()).collect();

        models.sort();
        models.dedup();
        models
    }

    /// Counterweights available for a crane model, ascending
    pub fn counterweights(&self, crane_model: &str) -> Vec<f64> {
        let mut counterweights: Vec<f64> = self
            .records
            .iter()
            .filter(|r| r.crane_model == crane_model)
            .map(|r| r.counterweight_t)
            .collect();

        counterweights.sort_by(|a, b| a.total_cmp(b));
        counterweights.dedup();
        counterweights
    }

    /// Outrigger bases available for a crane model and counterweight
    pub fn outrigger_bases(&self, crane_model: &str, counterweight_t: f64) -> Vec<String> {
        let mut bases: Vec<String> = self
            .records
            .iter()
            .filter(|r| r.crane_model == crane_model && r.counterweight_t == counterweight_t)
            .map(|r| r.outrigger_base.clone())
            .collect();

        bases.sort();
        bases.dedup();
        bases
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a ConfigurationRecord;
    type IntoIter = std::slice::Iter<'a, ConfigurationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl From<Vec<ConfigurationRecord>> for RecordSet {
    fn from(records: Vec<ConfigurationRecord>) -> Self {
        Self::new(records)
    }
}

// Key with numbers as bit patterns so it can be hashed. Zero is normalized so
// that 0.0 and -0.0 collide the same way `==` treats them.
#[derive(PartialEq, Eq, Hash)]
struct HashableKey<'a> {
    crane_model: &'a str,
    counterweight_bits: u64,
    outrigger_base: &'a str,
    radius_bits: u64,
    slew_position: &'a str,
}

fn number_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

impl<'a> From<&'a ConfigurationRecord> for HashableKey<'a> {
    fn from(record: &'a ConfigurationRecord) -> Self {
        Self {
            crane_model: &record.crane_model,
            counterweight_bits: number_bits(record.counterweight_t),
            outrigger_base: &record.outrigger_base,
            radius_bits: number_bits(record.radius_m),
            slew_position: &record.slew_position,
        }
    }
}
