use chrono::NaiveDate;
use serde::Serialize;

use crate::directory::resolver::NOT_FOUND;
use crate::directory::{normalize_name, Resolution};
use crate::parser::RosterRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contact {
    pub name: String,
    pub phone: Resolution,
}

impl From<(String, Resolution)> for Contact {
    fn from((name, phone): (String, Resolution)) -> Self {
        Self { name, phone }
    }
}

/// Resolved contacts by role. A name appears in at most one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactBuckets {
    pub seniors: Vec<Contact>,
    pub admins: Vec<Contact>,
    pub attendings: Vec<Contact>,
    pub interns: Vec<Contact>,
}

impl ContactBuckets {
    pub fn labeled(&self) -> [(&'static str, &[Contact]); 4] {
        [
            ("Seniors", self.seniors.as_slice()),
            ("Admins", self.admins.as_slice()),
            ("Attendings", self.attendings.as_slice()),
            ("Interns", self.interns.as_slice()),
        ]
    }

    fn contains(&self, name: &str) -> bool {
        let key = normalize_name(name);
        self.labeled()
            .iter()
            .flat_map(|(_, bucket)| bucket.iter())
            .any(|c| normalize_name(&c.name) == key)
    }

    /// Every distinct resolved number, seniors first; never the not-found sentinel
    pub fn phones(&self) -> Vec<String> {
        let mut phones: Vec<String> = Vec::new();
        for (_, bucket) in self.labeled() {
            for phone in bucket.iter().filter_map(|c| c.phone.phone()) {
                if phone.eq_ignore_ascii_case(NOT_FOUND) {
                    continue;
                }
                if !phones.iter().any(|p| p == phone) {
                    phones.push(phone.to_string());
                }
            }
        }
        phones
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactReport {
    pub week_start: Option<NaiveDate>,
    pub buckets: ContactBuckets,
    pub phones: Vec<String>,
}

impl ContactReport {
    pub fn new(week_start: Option<NaiveDate>, buckets: ContactBuckets) -> Self {
        let phones = buckets.phones();
        Self { week_start, buckets, phones }
    }
}

/// Splits resolved contacts into exclusive buckets.
///
/// `seniors` is the merged PGY2/PGY3/admin pool; names on the `admins` list move
/// to their own bucket. Attendings already listed as senior or admin are dropped,
/// and interns already listed anywhere else are dropped.
pub fn aggregate(
    seniors: Vec<Contact>,
    attendings: Vec<Contact>,
    interns: Option<Vec<Contact>>,
    admins: &[String],
) -> ContactBuckets {
    let admin_keys: Vec<String> = admins.iter().map(|a| normalize_name(a)).collect();
    let (admin_bucket, senior_bucket): (Vec<Contact>, Vec<Contact>) = seniors
        .into_iter()
        .partition(|c| admin_keys.contains(&normalize_name(&c.name)));

    let mut buckets = ContactBuckets {
        seniors: senior_bucket,
        admins: admin_bucket,
        ..ContactBuckets::default()
    };

    for contact in attendings {
        if !buckets.contains(&contact.name) {
            buckets.attendings.push(contact);
        }
    }

    for contact in interns.unwrap_or_default() {
        if !buckets.contains(&contact.name) {
            buckets.interns.push(contact);
        }
    }

    buckets
}

/// Doctor names from the roster rows, in sheet order
pub fn attending_names(rows: &[RosterRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        if !row.doctor.is_empty() && !names.contains(&row.doctor) {
            names.push(row.doctor.clone());
        }
    }
    names
}
