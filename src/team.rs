use std::fmt;

use serde::{Serialize, Serializer};

/// Rank given to every team outside the fixed display order
pub const UNRANKED: u8 = 99;

/// Canonical team names shown in the census message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalTeam {
    Post,
    Short,
    Medium,
    Lead,
    Orange,
    Other(String),
}

impl CanonicalTeam {
    /// Classifies a lowercased team token from the role column.
    /// Unknown tokens pass through capitalized.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "post" => CanonicalTeam::Post,
            "short" => CanonicalTeam::Short,
            "med" | "medium" => CanonicalTeam::Medium,
            "lead" | "long" => CanonicalTeam::Lead,
            _ => CanonicalTeam::Other(capitalize(raw)),
        }
    }

    /// Display precedence: Post < Short < Medium < Lead < everything else
    pub fn rank(&self) -> u8 {
        match self {
            CanonicalTeam::Post => 0,
            CanonicalTeam::Short => 1,
            CanonicalTeam::Medium => 2,
            CanonicalTeam::Lead => 3,
            CanonicalTeam::Orange | CanonicalTeam::Other(_) => UNRANKED,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CanonicalTeam::Post => "Post",
            CanonicalTeam::Short => "Short",
            CanonicalTeam::Medium => "Medium",
            CanonicalTeam::Lead => "Lead",
            CanonicalTeam::Orange => "Orange",
            CanonicalTeam::Other(name) => name,
        }
    }
}

impl fmt::Display for CanonicalTeam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for CanonicalTeam {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// First character uppercased, the rest lowercased
fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
