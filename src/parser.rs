use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::emoji::{select_emoji, ColorCategory, EmojiStyle};
use crate::error::{CensusError, CensusResult, RowError};
use crate::sheets::{cell, Grid};
use crate::team::CanonicalTeam;

/// Where the status/name/role columns sit in the roster sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnLayout {
    /// Find the header cell mentioning "green"; it and the next two columns are used
    #[default]
    Anchored,
    /// Zero-based column indices, every row is data. Defaults to columns M/N/O.
    Fixed {
        #[serde(default = "default_status_column")]
        status: usize,
        #[serde(default = "default_name_column")]
        name: usize,
        #[serde(default = "default_role_column")]
        role: usize,
    },
}

fn default_status_column() -> usize {
    12
}

fn default_name_column() -> usize {
    13
}

fn default_role_column() -> usize {
    14
}

/// Resolved column positions for one roster sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterColumns {
    pub status: usize,
    pub name: usize,
    pub role: usize,
    pub first_data_row: usize,
}

/// One qualifying roster row, typed
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    /// 1-based spreadsheet row number
    pub row: usize,
    pub color: String,
    pub category: Option<ColorCategory>,
    pub census: i64,
    pub doctor: String,
    pub team: CanonicalTeam,
}

/// One line of the census message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub team: CanonicalTeam,
    pub doctor: String,
    pub census: i64,
    pub emoji: String,
}

#[derive(Debug, Default)]
pub struct ParsedRoster {
    pub rows: Vec<RosterRow>,
    pub errors: Vec<RowError>,
}

/// Finds the status/name/role columns.
/// The anchored layout fails when no header mentions "green", since every offset depends on it.
pub fn locate_columns(grid: &Grid, layout: ColumnLayout) -> CensusResult<RosterColumns> {
    match layout {
        ColumnLayout::Fixed { status, name, role } => Ok(RosterColumns {
            status,
            name,
            role,
            first_data_row: 0,
        }),
        ColumnLayout::Anchored => {
            for (row_idx, row) in grid.iter().enumerate() {
                // A status cell like "GREEN: 4" is data, not the header
                let anchor = row.iter().position(|h| {
                    h.to_lowercase().contains("green") && split_status(h).map_or(true, |(_, census)| census.parse::<i64>().is_err())
                });
                if let Some(col) = anchor {
                    return Ok(RosterColumns {
                        status: col,
                        name: col + 1,
                        role: col + 2,
                        first_data_row: row_idx + 1,
                    });
                }
            }
            Err(CensusError::HeaderAnchorMissing)
        }
    }
}

/// Splits "COLOR: number" on the first colon into an uppercased color and the trimmed census text
pub fn split_status(status: &str) -> Option<(String, &str)> {
    let (color, census) = status.split_once(':')?;
    Some((color.trim().to_uppercase(), census.trim()))
}

/// Whether a row belongs in the message: an on-call role, or an orange row when orange is included
pub fn qualifies(role: &str, color: &str, include_orange: bool) -> bool {
    role.trim().ends_with("CALL") || (color == "ORANGE" && include_orange)
}

/// Parses one row. `Ok(None)` means the row is not part of the roster.
pub fn parse_row(
    row: usize,
    status: &str,
    name: &str,
    role: &str,
    include_orange: bool,
) -> Result<Option<RosterRow>, RowError> {
    let Some((color, census_text)) = split_status(status) else {
        return Ok(None);
    };
    if !qualifies(role, &color, include_orange) {
        return Ok(None);
    }

    let census = census_text.parse::<i64>().map_err(|_| RowError::InvalidCensus {
        row,
        value: census_text.to_string(),
    })?;

    let doctor = name.split('|').next().unwrap_or("").trim().to_string();

    let team = match role.trim().split_whitespace().next() {
        Some(token) => CanonicalTeam::classify(&token.to_lowercase()),
        None if color == "ORANGE" && include_orange => CanonicalTeam::Orange,
        None => return Ok(None),
    };

    Ok(Some(RosterRow {
        row,
        category: ColorCategory::from_token(&color),
        color,
        census,
        doctor,
        team,
    }))
}

/// Parses every data row. Bad rows are logged and collected, never fatal.
pub fn parse_roster(grid: &Grid, columns: &RosterColumns, include_orange: bool) -> ParsedRoster {
    let mut parsed = ParsedRoster::default();

    for (idx, record) in grid.iter().enumerate().skip(columns.first_data_row) {
        let status = cell(record, columns.status);
        let name = cell(record, columns.name);
        let role = cell(record, columns.role);

        match parse_row(idx + 1, status, name, role, include_orange) {
            Ok(Some(row)) => parsed.rows.push(row),
            Ok(None) => {}
            Err(err) => {
                warn!("Error parsing row: {}", err);
                parsed.errors.push(err);
            }
        }
    }

    parsed
}

/// Attaches an emoji to each row. Rows whose color has no emoji are left out.
pub fn to_entries<R: Rng + ?Sized>(rows: &[RosterRow], style: EmojiStyle, rng: &mut R) -> Vec<RosterEntry> {
    rows.iter()
        .filter_map(|row| {
            let emoji = select_emoji(row.category, style, rng)?;
            Some(RosterEntry {
                team: row.team.clone(),
                doctor: row.doctor.clone(),
                census: row.census,
                emoji: emoji.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64Mcg;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter().map(|r| r.iter().map(|c| c.to_string()).collect()).collect()
    }

    #[test]
    fn status_whitespace_variants_agree() {
        let (color_a, census_a) = split_status(" green : 7 ").unwrap();
        let (color_b, census_b) = split_status("GREEN:7").unwrap();
        assert_eq!(color_a, color_b);
        assert_eq!(census_a.parse::<i64>().unwrap(), census_b.parse::<i64>().unwrap());
    }

    #[test]
    fn parses_call_row() {
        let row = parse_row(2, "GREEN: 5", "Dr. A | notes", "Lead CALL", false).unwrap().unwrap();
        assert_eq!(row.team, CanonicalTeam::Lead);
        assert_eq!(row.doctor, "Dr. A");
        assert_eq!(row.census, 5);
        assert_eq!(row.category, Some(ColorCategory::Green));
    }

    #[test]
    fn orange_without_role_depends_on_flag() {
        let included = parse_row(3, "ORANGE: 3", "Dr. O", "", true).unwrap().unwrap();
        assert_eq!(included.team, CanonicalTeam::Orange);
        assert_eq!(included.census, 3);

        assert_eq!(parse_row(3, "ORANGE: 3", "Dr. O", "", false).unwrap(), None);
    }

    #[test]
    fn rows_without_colon_or_call_are_skipped() {
        assert_eq!(parse_row(1, "Census", "Name", "Role", true).unwrap(), None);
        assert_eq!(parse_row(1, "RED: 4", "Dr. B", "Short backup", false).unwrap(), None);
    }

    #[test]
    fn inclusion_rule() {
        assert!(qualifies("Post CALL ", "RED", false));
        assert!(qualifies("", "ORANGE", true));
        assert!(!qualifies("", "ORANGE", false));
        assert!(!qualifies("CALL later", "GREEN", true));
    }

    #[test]
    fn bad_census_is_reported_and_parsing_continues() {
        let sheet = grid(&[
            &["Green census", "Doctor", "Team"],
            &["GREEN: lots", "Dr. X", "Post CALL"],
            &["BLUE: 4", "Dr. Y | note", "short CALL"],
        ]);
        let columns = locate_columns(&sheet, ColumnLayout::Anchored).unwrap();
        let parsed = parse_roster(&sheet, &columns, false);

        assert_eq!(parsed.errors, vec![RowError::InvalidCensus { row: 2, value: "lots".to_string() }]);
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].doctor, "Dr. Y");
        assert_eq!(parsed.rows[0].team, CanonicalTeam::Short);
    }

    #[test]
    fn anchor_is_found_below_title_rows() {
        let sheet = grid(&[
            &["ADMITS"],
            &["", "Date", "GREEN = can admit", "Attending", "Team"],
            &["", "", "GREEN: 2", "Dr. Z", "Med CALL"],
        ]);
        let columns = locate_columns(&sheet, ColumnLayout::Anchored).unwrap();
        assert_eq!(columns, RosterColumns { status: 2, name: 3, role: 4, first_data_row: 2 });
    }

    #[test]
    fn missing_anchor_is_fatal() {
        let sheet = grid(&[&["Status", "Doctor"], &["GREEN: 3", "Dr. A"]]);
        assert!(matches!(locate_columns(&sheet, ColumnLayout::Anchored), Err(CensusError::HeaderAnchorMissing)));
    }

    #[test]
    fn fixed_layout_reads_every_row() {
        let sheet = grid(&[&["x", "PURPLE: 9", "Dr. P", "post CALL"]]);
        let layout = ColumnLayout::Fixed { status: 1, name: 2, role: 3 };
        let columns = locate_columns(&sheet, layout).unwrap();
        let parsed = parse_roster(&sheet, &columns, false);
        assert_eq!(parsed.rows[0].team, CanonicalTeam::Post);
    }

    #[test]
    fn unknown_colors_never_become_entries() {
        let rows = vec![
            parse_row(1, "YELLOW: 1", "Dr. Y", "Lead CALL", false).unwrap().unwrap(),
            parse_row(2, "RED: 2", "Dr. R", "Lead CALL", false).unwrap().unwrap(),
        ];
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        let entries = to_entries(&rows, EmojiStyle::Circles, &mut rng);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].emoji, "🔴");
    }
}
