use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive range of zero-based columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpan {
    pub first: usize,
    pub last: usize,
}

impl ColumnSpan {
    pub fn columns(&self) -> std::ops::RangeInclusive<usize> {
        self.first..=self.last
    }
}

/// Role labels used as row markers in the schedule sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleLabel {
    Pgy1,
    Pgy2,
    Pgy3,
}

impl RoleLabel {
    pub fn label(&self) -> &'static str {
        match self {
            RoleLabel::Pgy1 => "PGY1",
            RoleLabel::Pgy2 => "PGY2",
            RoleLabel::Pgy3 => "PGY3",
        }
    }
}

/// Shape of the schedule sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleLayout {
    /// Rows in one week block, counted from the dated row
    pub block_rows: usize,
    /// Column holding the PGY labels
    pub role_column: usize,
    /// Name columns of the PGY2/PGY3 rows
    pub senior_columns: ColumnSpan,
    /// Name columns of the PGY1 rows
    pub intern_columns: ColumnSpan,
    /// Consecutive PGY1 rows read from the first label
    pub intern_rows: usize,
    /// PGY1 cells containing any of these (lowercase) are rotations, not people
    pub blocklist: Vec<String>,
}

impl Default for ScheduleLayout {
    fn default() -> Self {
        Self {
            block_rows: 8,
            role_column: 1,
            senior_columns: ColumnSpan { first: 2, last: 8 },
            intern_columns: ColumnSpan { first: 2, last: 14 },
            intern_rows: 3,
            blocklist: ["ty", "neuro", "anes", "anesthesia"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// The located week: rows `start_row..end_row` of the sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBlock {
    pub start_row: usize,
    pub end_row: usize,
    pub start: NaiveDate,
}

/// Names listed for the current week, by role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekRoster {
    pub week_start: Option<NaiveDate>,
    pub pgy1: Vec<String>,
    pub pgy2: Vec<String>,
    pub pgy3: Vec<String>,
}
