use chrono::NaiveDate;

use crate::sheets::{cell, Grid};
use super::types::{ColumnSpan, RoleLabel, ScheduleLayout, WeekBlock, WeekRoster};
use super::week::locate_week;

/// First row of the block whose label column matches. Blank or short rows never match.
fn find_label_row(grid: &Grid, block: &WeekBlock, role_column: usize, label: RoleLabel) -> Option<usize> {
    (block.start_row..block.end_row).find(|&idx| cell(&grid[idx], role_column).trim() == label.label())
}

fn names_in(row: &[String], span: ColumnSpan) -> impl Iterator<Item = &str> {
    span.columns()
        .map(move |col| cell(row, col).trim())
        .filter(|name| !name.is_empty())
}

/// PGY2/PGY3 names from the first labeled row in the block
pub fn senior_names(grid: &Grid, block: &WeekBlock, layout: &ScheduleLayout, label: RoleLabel) -> Vec<String> {
    let Some(idx) = find_label_row(grid, block, layout.role_column, label) else {
        return Vec::new();
    };
    names_in(&grid[idx], layout.senior_columns).map(str::to_string).collect()
}

/// PGY1 names from the consecutive intern rows starting at the first PGY1 label.
/// Rotation cells (anything hitting the blocklist) are skipped and colons are removed.
pub fn intern_names(grid: &Grid, block: &WeekBlock, layout: &ScheduleLayout) -> Vec<String> {
    let Some(first) = find_label_row(grid, block, layout.role_column, RoleLabel::Pgy1) else {
        return Vec::new();
    };
    let last = (first + layout.intern_rows).min(grid.len());

    let mut names = Vec::new();
    for row in &grid[first..last] {
        for candidate in names_in(row, layout.intern_columns) {
            let lower = candidate.to_lowercase();
            if layout.blocklist.iter().any(|blocked| lower.contains(blocked.as_str())) {
                continue;
            }
            let name = candidate.replace(':', "");
            let name = name.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Everyone listed for the week containing `today`; empty lists when no week matches
pub fn week_roster(grid: &Grid, today: NaiveDate, layout: &ScheduleLayout) -> WeekRoster {
    let Some(block) = locate_week(grid, today, layout.block_rows) else {
        return WeekRoster::default();
    };

    WeekRoster {
        week_start: Some(block.start),
        pgy1: intern_names(grid, &block, layout),
        pgy2: senior_names(grid, &block, layout, RoleLabel::Pgy2),
        pgy3: senior_names(grid, &block, layout, RoleLabel::Pgy3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
    }

    fn sample() -> Grid {
        grid(&[
            &["5/26/2025", "", "Mon", "Tue"],
            &["", "PGY3", "Old Senior"],
            &["6/2/2025", "", "Mon", "Tue", "Wed"],
            &["", "PGY3", "Alice Adams", "", "Alice Adams"],
            &["", "PGY2", "Ben Brown", "Cara Cole"],
            &["", "PGY1", "Dan Diaz:", "TY Intern", "Neuro"],
            &["", "", "Eve Evans", "anesthesia"],
            &[""],
            &["", "PGY1", "Late Row"],
            &["6/9/2025", "", "Mon"],
        ])
    }

    #[test]
    fn extracts_roles_for_current_week() {
        let roster = week_roster(&sample(), today(), &ScheduleLayout::default());
        assert_eq!(roster.week_start, NaiveDate::from_ymd_opt(2025, 6, 2));
        assert_eq!(roster.pgy3, vec!["Alice Adams", "Alice Adams"]);
        assert_eq!(roster.pgy2, vec!["Ben Brown", "Cara Cole"]);
        assert_eq!(roster.pgy1, vec!["Dan Diaz", "Eve Evans"]);
    }

    #[test]
    fn blocklist_matches_substrings() {
        let sheet = grid(&[
            &["6/2/2025", "PGY1", "Matty Moss", "Pat Pine"],
        ]);
        let roster = week_roster(&sheet, today(), &ScheduleLayout::default());
        assert_eq!(roster.pgy1, vec!["Pat Pine"]);
    }

    #[test]
    fn no_week_means_no_names() {
        let far_future = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        assert_eq!(week_roster(&sample(), far_future, &ScheduleLayout::default()), WeekRoster::default());
    }

    #[test]
    fn blank_label_cells_do_not_match() {
        let sheet = grid(&[&["6/2/2025"], &[], &["", ""]]);
        let roster = week_roster(&sheet, today(), &ScheduleLayout::default());
        assert!(roster.pgy1.is_empty() && roster.pgy2.is_empty() && roster.pgy3.is_empty());
        assert!(roster.week_start.is_some());
    }
}
