use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::contacts::ContactReport;
use crate::parser::RosterEntry;

pub const GREETING: &str = "Good morning! Please confirm census:";

/// Formats one entry as "<emoji> <team>/<doctor>: <census>"
pub fn format_entry(entry: &RosterEntry) -> String {
    format!("{} {}/{}: {}", entry.emoji, entry.team, entry.doctor, entry.census)
}

/// Builds the census message: greeting, blank line, then one line per entry sorted by team.
/// The sort is stable, so entries of the same team keep their sheet order.
pub fn format_message(entries: &[RosterEntry]) -> String {
    let mut sorted: Vec<&RosterEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.team.rank());

    let mut message = format!("{}\n\n", GREETING);
    for entry in sorted {
        message.push_str(&format_entry(entry));
        message.push('\n');
    }
    message
}

/// Joins phone numbers for pasting into a group message
pub fn format_phone_list(phones: &[String], separator: &str) -> String {
    phones.join(separator)
}

/// Prints a contact report grouped by bucket
pub fn print_contacts(report: &ContactReport, separator: &str) {
    match report.week_start {
        Some(start) => println!("\n=== Week of {} ===", start.format("%m/%d/%Y")),
        None => println!("\n⚠️  No schedule week contains today"),
    }

    for (label, bucket) in report.buckets.labeled() {
        if bucket.is_empty() {
            continue;
        }
        println!("\n{} ({}):", label, bucket.len());
        for contact in bucket {
            println!("  - {}: {}", contact.name, contact.phone);
        }
    }

    println!("\nPhone numbers ({}):", report.phones.len());
    println!("{}", format_phone_list(&report.phones, separator));
}

/// Writes text output to a file, as shown on screen
pub fn write_to_file<P: AsRef<Path>>(text: &str, path: P) -> Result<(), std::io::Error> {
    let mut file = File::create(path)?;
    write!(file, "{}", text)?;
    Ok(())
}
