use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::sheets::{cell, Grid};
use super::types::WeekBlock;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%A, %B %d, %Y", "%d-%b-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"];

/// Parses a schedule date cell. Slash dates are month/day/year; two-digit years are 20xx.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(date) = parse_slash_date(text) {
        return Some(date);
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
    {
        return Some(date);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}

/// "3/4/2025" or "03/04/25"
fn parse_slash_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let month: u32 = parts[0].trim().parse().ok()?;
    let day: u32 = parts[1].trim().parse().ok()?;
    let year_text = parts[2].trim();
    let mut year: i32 = year_text.parse().ok()?;
    if year_text.len() <= 2 {
        year += 2000;
    }

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Every dated row in the first column, top to bottom
pub fn week_starts(grid: &Grid) -> Vec<(usize, NaiveDate)> {
    grid.iter()
        .enumerate()
        .filter_map(|(idx, row)| parse_date(cell(row, 0)).map(|date| (idx, date)))
        .collect()
}

/// Whether `today` falls in the seven days starting at `start`, both ends inclusive
pub fn in_week(start: NaiveDate, today: NaiveDate) -> bool {
    match start.checked_add_days(Days::new(6)) {
        Some(end) => start <= today && today <= end,
        None => false,
    }
}

/// Finds the first week block containing `today`
pub fn locate_week(grid: &Grid, today: NaiveDate, block_rows: usize) -> Option<WeekBlock> {
    week_starts(grid)
        .into_iter()
        .find(|(_, start)| in_week(*start, today))
        .map(|(start_row, start)| WeekBlock {
            start_row,
            end_row: (start_row + block_rows).min(grid.len()),
            start,
        })
}
