use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::directory::resolver::DEFAULT_THRESHOLD;
use crate::emoji::EmojiStyle;
use crate::error::{CensusError, CensusResult};
use crate::parser::ColumnLayout;
use crate::schedule::ScheduleLayout;
use crate::sheets::RetryPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "census.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub message: MessageConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub contacts: ContactsConfig,
    #[serde(default)]
    pub schedule: ScheduleLayout,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where each sheet is read from: a CSV export URL or a local CSV path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub roster: String,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub directory: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageConfig {
    #[serde(default)]
    pub emoji_style: EmojiStyle,
    #[serde(default)]
    pub include_orange: bool,
    /// Fixed emoji seed; entropy when unset
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub layout: ColumnLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsConfig {
    pub include_interns: bool,
    pub threshold: f64,
    /// Always looked up with the seniors, then listed on their own
    pub admins: Vec<String>,
    pub separator: String,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            include_interns: false,
            threshold: DEFAULT_THRESHOLD,
            admins: Vec::new(),
            separator: "; ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub attempts: u32,
    pub retry_delay_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

impl BackendConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.attempts,
            delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl Config {
    /// Reads the config file; a missing file means defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CensusResult<()> {
        if !(0.0..=100.0).contains(&self.contacts.threshold) {
            return Err(CensusError::Config(format!(
                "contacts.threshold must be between 0 and 100, got {}",
                self.contacts.threshold
            )));
        }
        for (name, span) in [
            ("senior_columns", self.schedule.senior_columns),
            ("intern_columns", self.schedule.intern_columns),
        ] {
            if span.first > span.last {
                return Err(CensusError::Config(format!("schedule.{} starts after it ends", name)));
            }
        }
        if self.schedule.block_rows == 0 {
            return Err(CensusError::Config("schedule.block_rows must be positive".to_string()));
        }
        Ok(())
    }

    /// Location of a named sheet, or a config error when it was never set
    pub fn sheet(&self, sheet: &str) -> CensusResult<&str> {
        let location = match sheet {
            "roster" => &self.sheets.roster,
            "schedule" => &self.sheets.schedule,
            "directory" => &self.sheets.directory,
            _ => return Err(CensusError::Config(format!("unknown sheet '{}'", sheet))),
        };
        if location.trim().is_empty() {
            return Err(CensusError::Config(format!("sheets.{} is not set", sheet)));
        }
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ColumnSpan;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.contacts.threshold, 70.0);
        assert_eq!(config.contacts.separator, "; ");
        assert_eq!(config.message.emoji_style, EmojiStyle::Circles);
        assert_eq!(config.roster.layout, ColumnLayout::Anchored);
        assert_eq!(config.schedule.block_rows, 8);
        assert_eq!(config.backend.retry_policy().attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::load(dir.path().join("census.toml"))?;
        assert!(config.sheets.roster.is_empty());
        Ok(())
    }

    #[test]
    fn loads_partial_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("census.toml");
        let mut file = fs::File::create(&path)?;
        write!(
            file,
            r#"
[sheets]
roster = "https://example.com/roster.csv"
directory = "directory.csv"

[message]
emoji_style = "fruits"
include_orange = true

[roster.layout]
kind = "fixed"
status = 12
name = 13
role = 14

[contacts]
admins = ["Pat Chief", "Sam Director"]
threshold = 90

[schedule]
senior_columns = {{ first = 2, last = 6 }}
"#
        )?;

        let config = Config::load(&path)?;
        assert_eq!(config.sheets.roster, "https://example.com/roster.csv");
        assert_eq!(config.message.emoji_style, EmojiStyle::Fruits);
        assert!(config.message.include_orange);
        assert_eq!(config.roster.layout, ColumnLayout::Fixed { status: 12, name: 13, role: 14 });
        assert_eq!(config.contacts.admins.len(), 2);
        assert_eq!(config.contacts.threshold, 90.0);
        assert_eq!(config.contacts.separator, "; ");
        assert_eq!(config.schedule.senior_columns, ColumnSpan { first: 2, last: 6 });
        assert_eq!(config.schedule.intern_rows, 3);
        Ok(())
    }

    #[test]
    fn bare_fixed_layout_uses_columns_m_n_o() -> Result<()> {
        let config: Config = toml::from_str("[roster.layout]\nkind = \"fixed\"\n")?;
        assert_eq!(config.roster.layout, ColumnLayout::Fixed { status: 12, name: 13, role: 14 });

        let config: Config = toml::from_str("[roster.layout]\nkind = \"fixed\"\nname = 4\n")?;
        assert_eq!(config.roster.layout, ColumnLayout::Fixed { status: 12, name: 4, role: 14 });
        Ok(())
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut config = Config::default();
        config.contacts.threshold = 120.0;
        assert!(matches!(config.validate(), Err(CensusError::Config(_))));
    }

    #[test]
    fn unset_sheet_is_a_config_error() {
        let config = Config::default();
        assert!(matches!(config.sheet("roster"), Err(CensusError::Config(_))));
    }
}
