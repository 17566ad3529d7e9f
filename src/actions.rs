//! The two user actions: build the census message, and build the contact list.
//!
//! Each action claims the session, reads its sheets fresh (with retry),
//! runs the pure pipeline and records its result on the session.

use chrono::{Local, NaiveDate};
use log::info;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::contacts::{aggregate, attending_names, Contact, ContactReport};
use crate::directory::Directory;
use crate::display::format_message;
use crate::emoji::EmojiStyle;
use crate::error::{CensusError, CensusResult};
use crate::parser::{locate_columns, parse_roster, to_entries, ColumnLayout, RosterEntry, RosterRow};
use crate::schedule::{week_roster, ScheduleLayout};
use crate::session::Session;
use crate::sheets::{fetch_with_retry, Grid, SheetBackend};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageOptions {
    pub style: EmojiStyle,
    pub include_orange: bool,
    pub seed: Option<u64>,
}

impl MessageOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            style: config.message.emoji_style,
            include_orange: config.message.include_orange,
            seed: config.message.seed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactOptions {
    pub include_interns: bool,
    pub include_orange: bool,
    pub threshold: f64,
    pub today: NaiveDate,
}

impl ContactOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            include_interns: config.contacts.include_interns,
            include_orange: config.message.include_orange,
            threshold: config.contacts.threshold,
            today: Local::now().date_naive(),
        }
    }

    /// Range checks for values overridden after the config was loaded
    pub fn validate(&self) -> CensusResult<()> {
        if !(0.0..=100.0).contains(&self.threshold) {
            return Err(CensusError::Config(format!(
                "threshold must be between 0 and 100, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CensusReport {
    pub message: String,
    pub entries: Vec<RosterEntry>,
    /// Rows dropped because they could not be parsed
    pub row_errors: Vec<String>,
}

/// Builds the census message from an already-read roster sheet
pub fn build_census(grid: &Grid, layout: ColumnLayout, options: &MessageOptions) -> CensusResult<CensusReport> {
    let columns = locate_columns(grid, layout)?;
    let parsed = parse_roster(grid, &columns, options.include_orange);

    let mut rng = match options.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_entropy(),
    };
    let entries = to_entries(&parsed.rows, options.style, &mut rng);

    Ok(CensusReport {
        message: format_message(&entries),
        entries,
        row_errors: parsed.errors.iter().map(ToString::to_string).collect(),
    })
}

/// Resolves everyone on call today against the directory and buckets them
pub fn build_contacts(
    rows: &[RosterRow],
    schedule: &Grid,
    directory: &Directory,
    layout: &ScheduleLayout,
    admins: &[String],
    options: &ContactOptions,
) -> ContactReport {
    let week = week_roster(schedule, options.today, layout);
    if week.week_start.is_none() {
        info!("No schedule week contains {}", options.today);
    }

    let resolve = |names: Vec<&str>| -> Vec<Contact> {
        directory
            .resolve_all(names, options.threshold)
            .into_iter()
            .map(Contact::from)
            .collect()
    };

    let senior_pool: Vec<&str> = week
        .pgy2
        .iter()
        .chain(week.pgy3.iter())
        .chain(admins.iter())
        .map(String::as_str)
        .collect();
    let seniors = resolve(senior_pool);

    let attending_pool = attending_names(rows);
    let attendings = resolve(attending_pool.iter().map(String::as_str).collect());

    let interns = options
        .include_interns
        .then(|| resolve(week.pgy1.iter().map(String::as_str).collect()));

    let buckets = aggregate(seniors, attendings, interns, admins);
    ContactReport::new(week.week_start, buckets)
}

/// Reads the roster sheet and builds the census message
pub async fn generate_message(
    session: &Session,
    backend: &dyn SheetBackend,
    config: &Config,
    options: &MessageOptions,
) -> CensusResult<CensusReport> {
    let _guard = session.begin()?;
    info!("Generating census message ({} style, orange {})", options.style, options.include_orange);

    let policy = config.backend.retry_policy();
    let grid = fetch_with_retry(backend, "roster", config.sheet("roster")?, policy).await?;
    let report = build_census(&grid, config.roster.layout, options)?;

    info!(
        "Census message has {} entries ({} rows dropped)",
        report.entries.len(),
        report.row_errors.len()
    );
    session.store_census(report.clone());
    Ok(report)
}

/// Reads roster, schedule and directory sheets and builds the contact list
pub async fn generate_contacts(
    session: &Session,
    backend: &dyn SheetBackend,
    config: &Config,
    options: &ContactOptions,
) -> CensusResult<ContactReport> {
    options.validate()?;
    let _guard = session.begin()?;
    info!("Generating contacts for {} (interns {})", options.today, options.include_interns);

    let policy = config.backend.retry_policy();
    let roster = fetch_with_retry(backend, "roster", config.sheet("roster")?, policy).await?;
    let schedule = fetch_with_retry(backend, "schedule", config.sheet("schedule")?, policy).await?;
    let directory_grid = fetch_with_retry(backend, "directory", config.sheet("directory")?, policy).await?;

    let columns = locate_columns(&roster, config.roster.layout)?;
    let parsed = parse_roster(&roster, &columns, options.include_orange);
    let directory = Directory::from_grid(&directory_grid)?;
    info!("Loaded {} directory records", directory.len());

    let report = build_contacts(
        &parsed.rows,
        &schedule,
        &directory,
        &config.schedule,
        &config.contacts.admins,
        options,
    );

    info!("Resolved {} distinct phone numbers", report.phones.len());
    session.store_contacts(report.clone());
    Ok(report)
}
