use std::fmt;

use log::debug;
use serde::{Serialize, Serializer};

use super::fuzzy::partial_ratio;
use super::{normalize_name, Directory};

/// Default similarity needed for a fuzzy match when looking up contacts
pub const DEFAULT_THRESHOLD: f64 = 70.0;

/// Shown in place of a phone number when a name has no directory match
pub const NOT_FOUND: &str = "not found";

/// Outcome of a directory lookup. `NotFound` is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    NotFound,
}

impl Resolution {
    pub fn phone(&self) -> Option<&str> {
        match self {
            Resolution::Found(phone) => Some(phone),
            Resolution::NotFound => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Found(phone) => f.write_str(phone),
            Resolution::NotFound => f.write_str(NOT_FOUND),
        }
    }
}

impl Serialize for Resolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Resolution::Found(phone) => serializer.serialize_some(phone),
            Resolution::NotFound => serializer.serialize_none(),
        }
    }
}

impl Directory {
    /// Looks a display name up: exact normalized match first, then the best
    /// partial-ratio match if it reaches `threshold`. Ties go to the earlier record.
    pub fn resolve(&self, name: &str, threshold: f64) -> Resolution {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return Resolution::NotFound;
        }

        if let Some(record) = self.records.iter().find(|r| r.full_name_lower == wanted) {
            return Resolution::Found(record.phone.clone());
        }

        let mut best: Option<(f64, &str, &str)> = None;
        for record in &self.records {
            let score = partial_ratio(&wanted, &record.full_name_lower);
            if best.map_or(true, |(top, _, _)| score > top) {
                best = Some((score, &record.full_name_lower, &record.phone));
            }
        }

        match best {
            Some((score, matched, phone)) if score >= threshold => {
                debug!("Matched '{}' to '{}' (score {:.1})", name, matched, score);
                Resolution::Found(phone.to_string())
            }
            Some((score, matched, _)) => {
                debug!("No match for '{}': best was '{}' at {:.1}", name, matched, score);
                Resolution::NotFound
            }
            None => Resolution::NotFound,
        }
    }

    /// Resolves each name in order, keeping the first spelling of repeated names
    pub fn resolve_all<'a, I>(&self, names: I, threshold: f64) -> Vec<(String, Resolution)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut resolved: Vec<(String, Resolution)> = Vec::new();
        for name in names {
            let name = name.trim();
            let key = normalize_name(name);
            if key.is_empty() || resolved.iter().any(|(seen, _)| normalize_name(seen) == key) {
                continue;
            }
            resolved.push((name.to_string(), self.resolve(name, threshold)));
        }
        resolved
    }
}
