//! Outrigger load table normalization
//!
//! Turns the per-counterweight load sheets into a flat list of
//! [`ConfigurationRecord`]s. A run is all or nothing: any malformed number in
//! an accepted data row aborts it.

pub mod config;
pub mod layout;
pub mod scan;
pub mod sheet;

pub use config::*;
pub use layout::*;
pub use scan::*;
pub use sheet::*;

use crate::dataset::{ConfigurationRecord, Outrigger, OutriggerLoads, RecordSet};
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error reading sheet {path}: {source}")]
    SheetIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Sheet {sheet} row {row}: invalid number in {column}: {value:?}")]
    InvalidNumber {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Sheet {sheet} row {row}: missing value for {column}")]
    MissingField {
        sheet: String,
        row: usize,
        column: String,
    },
}

/// Per-sheet counts from a normalization run
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub name: String,
    pub counterweight_t: f64,
    pub sections: usize,
    pub records: usize,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone)]
pub struct NormalizeOutput {
    pub records: RecordSet,
    pub sheets: Vec<SheetSummary>,
}

/// Converts load sheets into configuration records for one crane model
#[derive(Debug, Clone)]
pub struct Normalizer {
    crane_model: String,
    layout: ColumnLayout,
}

impl Normalizer {
    pub fn new(crane_model: impl Into<String>) -> Self {
        Self::with_layout(crane_model, ColumnLayout::default())
    }

    pub fn with_layout(crane_model: impl Into<String>, layout: ColumnLayout) -> Self {
        Self {
            crane_model: crane_model.into(),
            layout,
        }
    }

    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self::with_layout(&config.crane_model, config.columns.clone())
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    /// Normalize sheets in order and concatenate their records
    pub fn normalize(&self, sheets: &[Sheet]) -> Result<NormalizeOutput, NormalizeError> {
        let mut records = Vec::new();
        let mut summaries = Vec::with_capacity(sheets.len());

        for sheet in sheets {
            let (sheet_records, summary) = self.normalize_sheet(sheet)?;
            tracing::info!(
                "Sheet {} ({} t): {} records from {} sections, {} rows skipped",
                summary.name,
                summary.counterweight_t,
                summary.records,
                summary.sections,
                summary.skipped_rows
            );
            records.extend(sheet_records);
            summaries.push(summary);
        }

        Ok(NormalizeOutput {
            records: RecordSet::new(records),
            sheets: summaries,
        })
    }

    /// Normalize a single sheet
    pub fn normalize_sheet(
        &self,
        sheet: &Sheet,
    ) -> Result<(Vec<ConfigurationRecord>, SheetSummary), NormalizeError> {
        let mut state = ScanState::default();
        let mut records = Vec::new();
        let mut sections = 0;
        let mut skipped_rows = 0;

        for (idx, row) in sheet.rows.iter().enumerate() {
            let row_number = idx + 1;
            let (next, action) = state.step(row, &self.layout);
            state = next;

            match action {
                RowAction::SectionStart => {
                    sections += 1;
                    tracing::debug!(
                        "Sheet {} row {}: section {:?}",
                        sheet.name,
                        row_number,
                        state.base().unwrap_or_default()
                    );
                }
                RowAction::HeaderCaptured => {}
                RowAction::Skipped => {
                    skipped_rows += 1;
                    tracing::debug!("Sheet {} row {}: skipped", sheet.name, row_number);
                }
                RowAction::Data => {
                    let (Some(base), Some(headers)) = (state.base(), state.headers()) else {
                        continue;
                    };
                    match self.convert_row(sheet, row_number, base, headers, row)? {
                        Some(record) => records.push(record),
                        None => skipped_rows += 1,
                    }
                }
            }
        }

        if let (false, Some(base)) = (state.is_ready(), state.base()) {
            tracing::warn!("Sheet {}: section {:?} has no header row", sheet.name, base);
        }

        let summary = SheetSummary {
            name: sheet.name.clone(),
            counterweight_t: sheet.counterweight_t,
            sections,
            records: records.len(),
            skipped_rows,
        };
        Ok((records, summary))
    }

    /// Convert a data row. `None` for blank separator rows.
    fn convert_row(
        &self,
        sheet: &Sheet,
        row_number: usize,
        base: &str,
        headers: &[String],
        row: &[String],
    ) -> Result<Option<ConfigurationRecord>, NormalizeError> {
        // Later duplicate header names win
        let fields: HashMap<&str, &str> = headers
            .iter()
            .map(String::as_str)
            .zip(row.iter().map(|cell| cell.trim()))
            .collect();

        let value = |column: &str| fields.get(column).copied().filter(|v| !v.is_empty());

        let (Some(radius), Some(slew_position)) = (
            value(&self.layout.radius),
            value(&self.layout.slew_position),
        ) else {
            tracing::debug!("Sheet {} row {}: no radius or slew, skipped", sheet.name, row_number);
            return Ok(None);
        };

        let parse = |column: &str, raw: &str| {
            parse_number(raw).ok_or_else(|| NormalizeError::InvalidNumber {
                sheet: sheet.name.clone(),
                row: row_number,
                column: column.to_string(),
                value: raw.to_string(),
            })
        };
        let number = |column: &str| -> Result<f64, NormalizeError> {
            let raw = value(column).ok_or_else(|| NormalizeError::MissingField {
                sheet: sheet.name.clone(),
                row: row_number,
                column: column.to_string(),
            })?;
            parse(column, raw)
        };

        let radius_m = parse(&self.layout.radius, radius)?;
        let [fl, fr, rl, rr] = Outrigger::ALL.map(|o| number(self.layout.load_column(o)));
        let loads = OutriggerLoads::new(fl?, fr?, rl?, rr?);

        Ok(Some(ConfigurationRecord::from_loads(
            &self.crane_model,
            sheet.counterweight_t,
            base,
            radius_m,
            slew_position,
            &loads,
        )))
    }
}

/// Parse a finite number from a cell
fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Load the configured sheets and normalize them
pub fn normalize_from_config(config: &NormalizeConfig) -> Result<NormalizeOutput, NormalizeError> {
    let sheets = config.load_sheets()?;
    let normalizer = Normalizer::from_config(config);
    tracing::debug!(
        "Section marker {:?}, header sentinel {:?}",
        normalizer.layout().section_marker,
        normalizer.layout().header_sentinel
    );
    normalizer.normalize(&sheets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header() -> Row {
        row(&["Counterweight_t", "Radius_m", "Slew_position", "FL_t", "FR_t", "RL_t", "RR_t"])
    }

    fn create_test_sheet() -> Sheet {
        Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["GMK5130-1 Phase 1 outrigger loads"]),
                row(&[""]),
                row(&["Outrigger base: 7.3m x 8.3m"]),
                header(),
                row(&["40.1", "10", "Over front", "30", "43", "21.5", "18.2"]),
                row(&["40.1", "12", "Over front", "28", "39.5", "20", "17"]),
                row(&["", "", "", "", "", "", ""]),
                row(&["Outrigger base: 7.3m x 6.0m"]),
                header(),
                row(&["40.1", "10", "Over side", "22", "19", "31", "12"]),
            ],
        )
    }

    #[test]
    fn test_minimal_sheet_yields_one_record() {
        let sheet = Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["Outrigger base: 7.3m x 8.3m"]),
                header(),
                row(&["40.1", "10.0", "Over front", "30.0", "43.0", "21.5", "18.2"]),
            ],
        );

        let output = Normalizer::new("GMK5130-1").normalize(&[sheet]).unwrap();

        assert_eq!(output.records.len(), 1);
        let record = &output.records.records()[0];
        assert_eq!(record.crane_model, "GMK5130-1");
        assert_eq!(record.counterweight_t, 40.1);
        assert_eq!(record.outrigger_base, "7.3m x 8.3m");
        assert_eq!(record.radius_m, 10.0);
        assert_eq!(record.slew_position, "Over front");
        assert_eq!(record.governing_outrigger, Outrigger::FrontRight);
        assert_eq!(record.governing_load_t, 43.0);
    }

    #[test]
    fn test_sections_and_separators() {
        let normalizer = Normalizer::new("GMK5130-1");
        let (records, summary) = normalizer.normalize_sheet(&create_test_sheet()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].outrigger_base, "7.3m x 8.3m");
        assert_eq!(records[1].radius_m, 12.0);
        assert_eq!(records[1].governing_load_t, 39.5);
        assert_eq!(records[2].outrigger_base, "7.3m x 6.0m");
        assert_eq!(records[2].governing_outrigger, Outrigger::RearLeft);

        assert_eq!(summary.sections, 2);
        assert_eq!(summary.records, 3);
        // banner, blank, separator
        assert_eq!(summary.skipped_rows, 3);
    }

    #[test]
    fn test_data_before_header_is_skipped() {
        let sheet = Sheet::new(
            "23.5t",
            23.5,
            vec![
                row(&["23.5", "10", "Over front", "99", "99", "99", "99"]),
                row(&["Outrigger base: 7.3m x 8.3m"]),
                row(&["23.5", "10", "Over front", "98", "98", "98", "98"]),
                header(),
                row(&["23.5", "10", "Over front", "20", "25", "15", "10"]),
            ],
        );

        let (records, summary) = Normalizer::new("GMK5130-1").normalize_sheet(&sheet).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].governing_load_t, 25.0);
        assert_eq!(summary.skipped_rows, 2);
    }

    #[test]
    fn test_trailing_section_without_header() {
        let sheet = Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["Outrigger base: 7.3m x 8.3m"]),
                header(),
                row(&["40.1", "10", "Over front", "30", "43", "21.5", "18.2"]),
                row(&["Outrigger base: 7.3m x 6.0m"]),
                row(&["40.1", "10", "Over side", "22", "19", "31", "12"]),
            ],
        );

        let normalizer = Normalizer::new("GMK5130-1");
        assert_eq!(normalizer.layout().section_marker, "Outrigger base:");

        let (records, summary) = normalizer.normalize_sheet(&sheet).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(summary.sections, 2);
        assert_eq!(summary.skipped_rows, 1);
    }

    #[test]
    fn test_counterweight_comes_from_sheet() {
        let sheet = Sheet::new(
            "6.0t",
            6.0,
            vec![
                row(&["Outrigger base: A"]),
                header(),
                row(&["999", "8", "Over rear", "11", "11", "26", "25.9"]),
            ],
        );

        let (records, _) = Normalizer::new("GMK5130-1").normalize_sheet(&sheet).unwrap();
        assert_eq!(records[0].counterweight_t, 6.0);
    }

    #[test]
    fn test_equal_loads_govern_front_left() {
        let sheet = Sheet::new(
            "6.0t",
            6.0,
            vec![
                row(&["Outrigger base: A"]),
                header(),
                row(&["6.0", "8", "Over rear", "12.5", "12.5", "12.5", "12.5"]),
            ],
        );

        let (records, _) = Normalizer::new("GMK5130-1").normalize_sheet(&sheet).unwrap();
        assert_eq!(records[0].governing_outrigger, Outrigger::FrontLeft);
        assert_eq!(records[0].governing_load_t, 12.5);
    }

    #[test]
    fn test_columns_matched_by_header_name() {
        let sheet = Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["Outrigger base: A"]),
                row(&["Counterweight_t", "RR_t", "RL_t", "FR_t", "FL_t", "Slew_position", "Radius_m"]),
                row(&["40.1", "5", "6", "7", "8", "Over front", "14"]),
            ],
        );

        let (records, _) = Normalizer::new("GMK5130-1").normalize_sheet(&sheet).unwrap();
        assert_eq!(records[0].radius_m, 14.0);
        assert_eq!(records[0].governing_outrigger, Outrigger::FrontLeft);
        assert_eq!(records[0].governing_load_t, 8.0);
    }

    #[test]
    fn test_invalid_load_aborts_run() {
        let mut good = create_test_sheet();
        good.name = "23.5t".into();
        let bad = Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["Outrigger base: A"]),
                header(),
                row(&["40.1", "10", "Over front", "30", "n/a", "21.5", "18.2"]),
            ],
        );

        let result = Normalizer::new("GMK5130-1").normalize(&[good, bad]);

        match result {
            Err(NormalizeError::InvalidNumber { sheet, row, column, value }) => {
                assert_eq!(sheet, "40.1t");
                assert_eq!(row, 3);
                assert_eq!(column, "FR_t");
                assert_eq!(value, "n/a");
            }
            other => panic!("expected InvalidNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_radius_aborts_run() {
        let sheet = Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["Outrigger base: A"]),
                header(),
                row(&["40.1", "ten", "Over front", "1", "2", "3", "4"]),
            ],
        );

        let result = Normalizer::new("GMK5130-1").normalize_sheet(&sheet);
        assert!(matches!(result, Err(NormalizeError::InvalidNumber { .. })));
    }

    #[test]
    fn test_missing_load_aborts_run() {
        let sheet = Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["Outrigger base: A"]),
                header(),
                row(&["40.1", "10", "Over front", "1", "2", "3"]),
            ],
        );

        let result = Normalizer::new("GMK5130-1").normalize_sheet(&sheet);
        match result {
            Err(NormalizeError::MissingField { column, .. }) => assert_eq!(column, "RR_t"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_load_rejected() {
        assert_eq!(parse_number("43.0"), Some(43.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn test_sheets_concatenated_in_order() {
        let first = Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["Outrigger base: A"]),
                header(),
                row(&["40.1", "10", "Over front", "1", "2", "3", "4"]),
            ],
        );
        let second = Sheet::new(
            "6.0t",
            6.0,
            vec![
                row(&["Outrigger base: B"]),
                header(),
                row(&["6.0", "8", "Over rear", "4", "3", "2", "1"]),
            ],
        );

        let output = Normalizer::new("GMK5130-1").normalize(&[first, second]).unwrap();

        let counterweights: Vec<f64> = output.records.iter().map(|r| r.counterweight_t).collect();
        assert_eq!(counterweights, vec![40.1, 6.0]);
        assert_eq!(output.sheets.len(), 2);
        assert_eq!(output.sheets[1].name, "6.0t");
    }

    #[test]
    fn test_governing_invariant_holds_for_every_record() {
        let sheet = Sheet::new(
            "40.1t",
            40.1,
            vec![
                row(&["Outrigger base: A"]),
                header(),
                row(&["40.1", "6", "Over front", "10", "30.5", "12", "30.5"]),
                row(&["40.1", "8", "Over side", "28", "14", "29.9", "9"]),
                row(&["40.1", "10", "Over rear", "7", "8", "19", "19.01"]),
            ],
        );

        let rows = sheet.rows[2..].to_vec();
        let (records, _) = Normalizer::new("GMK5130-1").normalize_sheet(&sheet).unwrap();

        for (record, raw) in records.iter().zip(rows) {
            let loads: Vec<f64> = raw[3..7].iter().map(|v| v.parse().unwrap()).collect();
            let max = loads.iter().cloned().fold(f64::MIN, f64::max);
            assert_eq!(record.governing_load_t, max);
        }
        assert_eq!(records[0].governing_outrigger, Outrigger::FrontRight);
        assert_eq!(records[2].governing_outrigger, Outrigger::RearRight);
    }
}
