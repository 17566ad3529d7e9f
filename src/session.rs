use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use serde::Serialize;

use crate::actions::CensusReport;
use crate::contacts::ContactReport;
use crate::error::{CensusError, CensusResult};

/// Per-caller state: whether an action is running, and the last results.
/// Owned by the caller (CLI run or web app) and handed to each action.
#[derive(Default)]
pub struct Session {
    busy: AtomicBool,
    last_census: Mutex<Option<CensusReport>>,
    last_contacts: Mutex<Option<ContactReport>>,
}

/// Marks the session busy until dropped
pub struct BusyGuard<'a> {
    session: &'a Session,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.session.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LastResults {
    pub census: Option<CensusReport>,
    pub contacts: Option<ContactReport>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the session for one action. A second trigger while one is in flight gets `Busy`.
    pub fn begin(&self) -> CensusResult<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CensusError::Busy)?;
        Ok(BusyGuard { session: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn store_census(&self, report: CensusReport) {
        if let Ok(mut slot) = self.last_census.lock() {
            *slot = Some(report);
        }
    }

    pub fn store_contacts(&self, report: ContactReport) {
        if let Ok(mut slot) = self.last_contacts.lock() {
            *slot = Some(report);
        }
    }

    pub fn last(&self) -> LastResults {
        LastResults {
            census: self.last_census.lock().ok().and_then(|s| s.clone()),
            contacts: self.last_contacts.lock().ok().and_then(|s| s.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_trigger_is_rejected_while_busy() {
        let session = Session::new();
        let guard = session.begin().unwrap();
        assert!(session.is_busy());
        assert!(matches!(session.begin(), Err(CensusError::Busy)));
        drop(guard);
        assert!(!session.is_busy());
        assert!(session.begin().is_ok());
    }

    #[test]
    fn keeps_last_results() {
        let session = Session::new();
        assert!(session.last().census.is_none());
        session.store_contacts(ContactReport::default());
        assert!(session.last().contacts.is_some());
    }
}
