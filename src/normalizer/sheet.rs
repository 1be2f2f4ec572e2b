use crate::normalizer::NormalizeError;

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A row of raw cells. Blank cells are empty strings.
pub type Row = Vec<String>;

/// One tab of the outrigger load workbook, tied to a counterweight
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub counterweight_t: f64,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, counterweight_t: f64, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            counterweight_t,
            rows,
        }
    }

    /// Read a sheet exported as CSV.
    ///
    /// Rows may have different lengths, there is no header line, and cells
    /// are trimmed.
    pub fn from_csv_reader<R: Read>(
        name: impl Into<String>,
        counterweight_t: f64,
        reader: R,
    ) -> Result<Self, NormalizeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self::new(name, counterweight_t, rows))
    }

    pub fn from_csv_path(
        name: impl Into<String>,
        counterweight_t: f64,
        path: impl AsRef<Path>,
    ) -> Result<Self, NormalizeError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| NormalizeError::SheetIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_reader(name, counterweight_t, file)
    }
}
