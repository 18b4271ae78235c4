//! Explicit auditing hooks
//!
//! The entity store calls [`Auditing::pre_insert`] before a row is first
//! stored and [`Auditing::pre_update`] before every later write. Creation
//! columns are set once; modification columns track the latest write.

use crate::contract::Audit;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Supplies the name recorded in `created_by` / `last_modified_by`
pub trait AuditorProvider: Send + Sync {
    fn current_auditor(&self) -> Option<String>;
}

/// A fresh random UUID per write
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomAuditor;

impl AuditorProvider for RandomAuditor {
    fn current_auditor(&self) -> Option<String> {
        Some(Uuid::new_v4().to_string())
    }
}

/// The same name for every write
#[derive(Debug, Clone)]
pub struct FixedAuditor(pub String);

impl AuditorProvider for FixedAuditor {
    fn current_auditor(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Timestamps only
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAuditor;

impl AuditorProvider for NoAuditor {
    fn current_auditor(&self) -> Option<String> {
        None
    }
}

/// Pre-insert / pre-update hooks invoked by the store
#[derive(Clone)]
pub struct Auditing {
    auditor: Arc<dyn AuditorProvider>,
}

impl Auditing {
    pub fn new(auditor: Arc<dyn AuditorProvider>) -> Self {
        Self { auditor }
    }

    /// Stamp creation and modification columns with the same values
    pub fn pre_insert(&self, audit: &mut Audit) {
        let now = Utc::now();
        let who = self.auditor.current_auditor();
        audit.created_at = Some(now);
        audit.updated_at = Some(now);
        audit.created_by = who.clone();
        audit.last_modified_by = who;
    }

    /// Stamp modification columns, restoring the stored creation columns
    pub fn pre_update(&self, audit: &mut Audit, stored: &Audit) {
        audit.created_at = stored.created_at;
        audit.created_by = stored.created_by.clone();
        audit.updated_at = Some(Utc::now());
        audit.last_modified_by = self.auditor.current_auditor();
    }
}

impl Default for Auditing {
    fn default() -> Self {
        Self::new(Arc::new(RandomAuditor))
    }
}

impl std::fmt::Debug for Auditing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auditing").finish_non_exhaustive()
    }
}
