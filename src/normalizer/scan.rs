//! Section/header tracking for the load table scan
//!
//! Each sheet is read top to bottom. A data row is only accepted once both
//! an outrigger base section and a column-header row for that section have
//! been seen:
//!
//! ```text
//! AwaitingBase --marker--> AwaitingHeader --header--> Ready
//!                               ^                       |
//!                               +-------marker----------+
//! ```
//!
//! Banner rows, blank rows and anything else before `Ready` are skipped.

use crate::normalizer::layout::ColumnLayout;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ScanState {
    /// No section marker seen yet
    #[default]
    AwaitingBase,

    /// Inside a section, waiting for its header row
    AwaitingHeader { base: String },

    /// Section and headers known, data rows accepted
    Ready { base: String, headers: Vec<String> },
}

/// What the scan did with a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    SectionStart,
    HeaderCaptured,
    Skipped,
    Data,
}

impl ScanState {
    /// Advance the scan by one row
    pub fn step(self, row: &[String], layout: &ColumnLayout) -> (ScanState, RowAction) {
        let first_cell = row.first().map(|cell| cell.trim()).unwrap_or("");

        // A new section always needs a fresh header row
        if let Some(rest) = first_cell.strip_prefix(layout.section_marker.as_str()) {
            let base = rest.trim().to_string();
            return (ScanState::AwaitingHeader { base }, RowAction::SectionStart);
        }

        if first_cell == layout.header_sentinel {
            return match self {
                // Headers without a section are dropped by the next marker anyway
                ScanState::AwaitingBase => (ScanState::AwaitingBase, RowAction::Skipped),
                ScanState::AwaitingHeader { base } | ScanState::Ready { base, .. } => {
                    let headers = row.iter().map(|cell| cell.trim().to_string()).collect();
                    (ScanState::Ready { base, headers }, RowAction::HeaderCaptured)
                }
            };
        }

        match self {
            ready @ ScanState::Ready { .. } => (ready, RowAction::Data),
            waiting => (waiting, RowAction::Skipped),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ScanState::Ready { .. })
    }

    /// Current outrigger base, if a section has started
    pub fn base(&self) -> Option<&str> {
        match self {
            ScanState::AwaitingBase => None,
            ScanState::AwaitingHeader { base } | ScanState::Ready { base, .. } => Some(base.as_str()),
        }
    }

    pub fn headers(&self) -> Option<&[String]> {
        match self {
            ScanState::Ready { headers, .. } => Some(headers.as_slice()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn header() -> Vec<String> {
        row(&["Counterweight_t", "Radius_m", "Slew_position", "FL_t", "FR_t", "RL_t", "RR_t"])
    }

    #[test]
    fn test_marker_starts_section() {
        let layout = ColumnLayout::default();
        let (state, action) = ScanState::default().step(&row(&["Outrigger base:  7.3m x 8.3m "]), &layout);

        assert_eq!(action, RowAction::SectionStart);
        assert_eq!(state.base(), Some("7.3m x 8.3m"));
        assert!(!state.is_ready());
    }

    #[test]
    fn test_header_after_marker_is_ready() {
        let layout = ColumnLayout::default();
        let (state, _) = ScanState::default().step(&row(&["Outrigger base: A"]), &layout);
        let (state, action) = state.step(&header(), &layout);

        assert_eq!(action, RowAction::HeaderCaptured);
        assert!(state.is_ready());
        assert_eq!(state.headers().unwrap()[1], "Radius_m");
    }

    #[test]
    fn test_rows_before_section_are_skipped() {
        let layout = ColumnLayout::default();
        let data = row(&["40.1", "10", "Over front", "1", "2", "3", "4"]);

        let (state, action) = ScanState::default().step(&data, &layout);
        assert_eq!(action, RowAction::Skipped);
        assert_eq!(state, ScanState::AwaitingBase);

        // Header without a section does not make the scan ready
        let (state, action) = state.step(&header(), &layout);
        assert_eq!(action, RowAction::Skipped);
        let (_, action) = state.step(&data, &layout);
        assert_eq!(action, RowAction::Skipped);
    }

    #[test]
    fn test_data_before_header_is_skipped() {
        let layout = ColumnLayout::default();
        let (state, _) = ScanState::default().step(&row(&["Outrigger base: A"]), &layout);
        let (state, action) = state.step(&row(&["40.1", "10", "Over front"]), &layout);

        assert_eq!(action, RowAction::Skipped);
        assert_eq!(state.base(), Some("A"));
    }

    #[test]
    fn test_new_marker_resets_headers() {
        let layout = ColumnLayout::default();
        let mut state = ScanState::default();
        for r in [row(&["Outrigger base: A"]), header()] {
            state = state.step(&r, &layout).0;
        }
        assert!(state.is_ready());

        let (state, action) = state.step(&row(&["Outrigger base: B"]), &layout);
        assert_eq!(action, RowAction::SectionStart);
        assert_eq!(state, ScanState::AwaitingHeader { base: "B".into() });

        let (_, action) = state.step(&row(&["40.1", "10", "Over front"]), &layout);
        assert_eq!(action, RowAction::Skipped);
    }

    #[test]
    fn test_ready_accepts_data() {
        let layout = ColumnLayout::default();
        let mut state = ScanState::default();
        for r in [row(&["Outrigger base: A"]), header()] {
            state = state.step(&r, &layout).0;
        }

        let (state, action) = state.step(&row(&["40.1", "10", "Over front", "1", "2", "3", "4"]), &layout);
        assert_eq!(action, RowAction::Data);
        assert!(state.is_ready());
    }
}
