pub mod fuzzy;
pub mod resolver;

use log::debug;
use serde::Serialize;

use crate::error::{CensusError, CensusResult};
use crate::sheets::{cell, Grid};

use resolver::NOT_FOUND;

pub use resolver::Resolution;

/// One staff member from the directory sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryRecord {
    /// "first last", lowercased, single-spaced
    pub full_name_lower: String,
    pub phone: String,
}

/// Staff directory in sheet order. Duplicate names are kept; lookups take the first.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub records: Vec<DirectoryRecord>,
}

/// Trim, lowercase and collapse inner whitespace
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn header_column(header: &[String], wanted: &'static str) -> CensusResult<usize> {
    header
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        .ok_or(CensusError::MissingDirectoryColumn(wanted))
}

impl Directory {
    /// Loads the directory sheet: header row first, with First, Last and Phone columns
    pub fn from_grid(grid: &Grid) -> CensusResult<Self> {
        let header = grid.first().map(Vec::as_slice).unwrap_or(&[]);
        let first_col = header_column(header, "First")?;
        let last_col = header_column(header, "Last")?;
        let phone_col = header_column(header, "Phone")?;

        let mut records = Vec::new();
        for (idx, row) in grid.iter().enumerate().skip(1) {
            let full_name_lower = normalize_name(&format!("{} {}", cell(row, first_col), cell(row, last_col)));
            let phone = cell(row, phone_col).trim().to_string();
            if full_name_lower.is_empty() || phone.is_empty() {
                debug!("Skipping directory row {}: missing name or phone", idx + 1);
                continue;
            }
            if phone.eq_ignore_ascii_case(NOT_FOUND) {
                debug!("Skipping directory row {}: phone reads '{}'", idx + 1, phone);
                continue;
            }
            records.push(DirectoryRecord { full_name_lower, phone });
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::resolver::DEFAULT_THRESHOLD;
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
    }

    #[test]
    fn loads_records_by_header_name() {
        let sheet = grid(&[
            &["Phone", " last ", "FIRST", "Pager"],
            &["555-1111", "Smith", "  John ", "x"],
            &["", "Nobody", "No", ""],
            &["555-2222", "de  la Cruz", "Ana", ""],
        ]);
        let directory = Directory::from_grid(&sheet).unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.records[0].full_name_lower, "john smith");
        assert_eq!(directory.records[1].full_name_lower, "ana de la cruz");
    }

    #[test]
    fn missing_column_is_an_error() {
        let sheet = grid(&[&["First", "Last"], &["John", "Smith"]]);
        assert!(matches!(Directory::from_grid(&sheet), Err(CensusError::MissingDirectoryColumn("Phone"))));
    }

    #[test]
    fn placeholder_phone_is_not_a_record() {
        let sheet = grid(&[
            &["First", "Last", "Phone"],
            &["Ann", "Lee", "not found"],
            &["Bo", "Day", "555-4444"],
        ]);
        let directory = Directory::from_grid(&sheet).unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.resolve("Ann Lee", DEFAULT_THRESHOLD), Resolution::NotFound);
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_name("  Jon   SMITH "), "jon smith");
    }
}
