//! Sheet access: every source is read into a plain grid of strings.
//!
//! A location starting with `http://` or `https://` is downloaded as CSV
//! (a Google Sheets `export?format=csv` link works); anything else is read
//! as a local CSV file. Rows may be ragged.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use csv::ReaderBuilder;
use log::{debug, warn};

use crate::error::{BackendError, CensusError, CensusResult};

/// Untyped sheet contents, row-major
pub type Grid = Vec<Vec<String>>;

/// Cell text, or "" past the end of a short row
pub fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

#[async_trait]
pub trait SheetBackend: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Grid, BackendError>;
}

/// Reads CSV from HTTP(S) URLs or local files
pub struct CsvBackend {
    client: reqwest::Client,
}

impl CsvBackend {
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl Default for CsvBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SheetBackend for CsvBackend {
    async fn fetch(&self, location: &str) -> Result<Grid, BackendError> {
        if is_remote(location) {
            let response = self.client.get(location).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(BackendError::Status {
                    url: location.to_string(),
                    status: status.as_u16(),
                });
            }
            let body = response.bytes().await?;
            parse_csv(&body)
        } else {
            let body = tokio::fs::read(location).await?;
            parse_csv(&body)
        }
    }
}

/// Fixed set of grids keyed by location, for offline runs and tests
#[derive(Default)]
pub struct MemoryBackend {
    sheets: HashMap<String, Grid>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheet(mut self, location: &str, grid: Grid) -> Self {
        self.sheets.insert(location.to_string(), grid);
        self
    }
}

#[async_trait]
impl SheetBackend for MemoryBackend {
    async fn fetch(&self, location: &str) -> Result<Grid, BackendError> {
        self.sheets
            .get(location)
            .cloned()
            .ok_or_else(|| BackendError::Unavailable(location.to_string()))
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Parses headerless, possibly ragged CSV into a grid
pub fn parse_csv(bytes: &[u8]) -> Result<Grid, BackendError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result?;
        grid.push(record.iter().map(str::to_string).collect());
    }
    Ok(grid)
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total tries, including the first one
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

/// Fetches a sheet, retrying transient failures with a fixed delay.
/// Gives up with `CensusError::Backend` once the attempts run out.
pub async fn fetch_with_retry(
    backend: &dyn SheetBackend,
    sheet: &str,
    location: &str,
    policy: RetryPolicy,
) -> CensusResult<Grid> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match backend.fetch(location).await {
            Ok(grid) => {
                debug!("Read {} rows from {} sheet", grid.len(), sheet);
                return Ok(grid);
            }
            Err(err) if attempt < attempts => {
                warn!("Reading {} sheet failed (attempt {}/{}): {}", sheet, attempt, attempts, err);
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(err) => {
                return Err(CensusError::Backend {
                    sheet: sheet.to_string(),
                    attempts,
                    source: err,
                });
            }
        }
    }
}
