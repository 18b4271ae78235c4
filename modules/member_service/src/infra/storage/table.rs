//! Generic in-memory entity store
//!
//! A [`Table`] keeps rows keyed by identity. Identities come from a monotonic
//! sequence, so identity order is insertion order and unsorted reads return
//! rows in the order they were inserted.
//!
//! Cross-table integrity is the caller's job: every mutating method takes a
//! `check` closure that runs under this table's write lock, after the caller
//! has taken whatever read guards it needs on other tables. Guards are always
//! taken in the order teams, then members.

use super::cache::ResultCache;
use crate::contract::Audit;
use crate::domain::audit::Auditing;
use crate::domain::query::{Fields, Predicate, Query};
use crate::domain::repository::StoreError;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, trace, warn};

/// A row type storable in a [`Table`]
pub trait Record: Fields + Clone + Send + Sync + 'static {
    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
    fn audit(&self) -> &Audit;
    fn audit_mut(&mut self) -> &mut Audit;
}

/// Read guard over a table's rows
pub struct TableRead<'a, T> {
    rows: RwLockReadGuard<'a, BTreeMap<u64, T>>,
}

impl<T> TableRead<'_, T> {
    pub fn contains(&self, id: u64) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }
}

pub struct Table<T: Record> {
    rows: RwLock<BTreeMap<u64, T>>,
    next_id: AtomicU64,
    auditing: Auditing,
    cache: Option<ResultCache<T>>,
}

impl<T: Record> Table<T> {
    /// Create an empty table; `cache_capacity == 0` disables result caching
    pub fn new(auditing: Auditing, cache_capacity: usize) -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            auditing,
            cache: (cache_capacity > 0).then(|| ResultCache::new(cache_capacity)),
        }
    }

    pub fn read(&self) -> TableRead<'_, T> {
        TableRead {
            rows: self.rows.read(),
        }
    }

    /// Store a transient entity under a fresh identity
    pub fn insert_checked(
        &self,
        entity: &T,
        check: impl FnOnce(&T) -> Result<(), StoreError>,
    ) -> Result<T, StoreError> {
        if entity.id() != 0 {
            return Err(StoreError::Constraint(format!(
                "{} {} is already persisted",
                T::ENTITY,
                entity.id()
            )));
        }
        check(entity)?;

        let mut rows = self.rows.write();
        let mut row = entity.clone();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        row.set_id(id);
        row.set_version(1);
        self.auditing.pre_insert(row.audit_mut());
        rows.insert(id, row.clone());
        self.invalidate();

        debug!(entity = T::ENTITY, id, "inserted");
        Ok(row)
    }

    /// Replace the stored row with the same identity
    pub fn update_checked(
        &self,
        entity: &T,
        check: impl FnOnce(&T) -> Result<(), StoreError>,
    ) -> Result<T, StoreError> {
        let id = entity.id();
        let mut rows = self.rows.write();
        let stored = rows.get(&id).ok_or(StoreError::NotFound {
            entity: T::ENTITY,
            id,
        })?;
        check(entity)?;

        let mut row = entity.clone();
        row.set_version(stored.version() + 1);
        self.auditing.pre_update(row.audit_mut(), stored.audit());
        rows.insert(id, row.clone());
        self.invalidate();

        debug!(entity = T::ENTITY, id, version = row.version(), "updated");
        Ok(row)
    }

    pub fn find_by_id(&self, id: u64) -> Option<T> {
        self.rows.read().get(&id).cloned()
    }

    /// Filter, stable-sort and window the rows
    pub fn find_all(&self, query: &Query) -> Result<Vec<T>, StoreError> {
        let plan = query.compile::<T>()?;
        trace!(entity = T::ENTITY, lock = ?plan.lock(), query = plan.fingerprint(), "select");

        let rows = self.rows.read();
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(plan.fingerprint())) {
            return Ok(hit);
        }

        let mut matched: Vec<&T> = rows.values().filter(|r| plan.matches(*r)).collect();
        if plan.is_sorted() {
            matched.sort_by(|a, b| plan.compare(*a, *b));
        }
        let result: Vec<T> = match plan.window() {
            Some(window) => window.apply(matched).into_iter().cloned().collect(),
            None => matched.into_iter().cloned().collect(),
        };

        if let Some(cache) = &self.cache {
            cache.put(plan.fingerprint(), &result);
        }
        Ok(result)
    }

    pub fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        let filter = predicate.compile::<T>()?;
        let rows = self.rows.read();
        Ok(rows.values().filter(|r| filter.matches(*r)).count() as u64)
    }

    /// Remove by identity; `check` may veto the removal
    pub fn delete_checked(
        &self,
        id: u64,
        check: impl FnOnce(&T) -> Result<(), StoreError>,
    ) -> Result<T, StoreError> {
        let mut rows = self.rows.write();
        let stored = rows.get(&id).ok_or(StoreError::NotFound {
            entity: T::ENTITY,
            id,
        })?;
        check(stored)?;
        let removed = rows.remove(&id).ok_or(StoreError::NotFound {
            entity: T::ENTITY,
            id,
        })?;
        self.invalidate();

        debug!(entity = T::ENTITY, id, "deleted");
        Ok(removed)
    }

    /// Remove every row after `check` approves each one
    pub fn delete_all_checked(
        &self,
        mut check: impl FnMut(&T) -> Result<(), StoreError>,
    ) -> Result<usize, StoreError> {
        let mut rows = self.rows.write();
        for row in rows.values() {
            check(row)?;
        }
        let removed = rows.len();
        rows.clear();
        self.invalidate();

        info!(entity = T::ENTITY, removed, "deleted all rows");
        Ok(removed)
    }

    /// Apply `transform` to every matching row as one step.
    ///
    /// All transformed copies are validated before any is written back; a
    /// failure leaves the table untouched. Copies handed out earlier are not
    /// refreshed.
    pub fn bulk_update_checked(
        &self,
        predicate: &Predicate,
        transform: &dyn Fn(&mut T),
        mut check: impl FnMut(&T) -> Result<(), StoreError>,
    ) -> Result<usize, StoreError> {
        let filter = predicate.compile::<T>()?;
        let mut rows = self.rows.write();

        let mut staged = Vec::new();
        for (&id, stored) in rows.iter() {
            if !filter.matches(stored) {
                continue;
            }
            let mut row = stored.clone();
            transform(&mut row);
            if row.id() != id {
                return Err(StoreError::Constraint(format!(
                    "bulk update must not change {} identity {}",
                    T::ENTITY,
                    id
                )));
            }
            check(&row)?;
            row.set_version(stored.version() + 1);
            self.auditing.pre_update(row.audit_mut(), stored.audit());
            staged.push(row);
        }

        let affected = staged.len();
        for row in staged {
            rows.insert(row.id(), row);
        }
        self.invalidate();

        warn!(
            entity = T::ENTITY,
            affected, "bulk update applied; previously read copies are stale"
        );
        Ok(affected)
    }

    /// Stored version of a row, if it still exists
    pub fn version_of(&self, id: u64) -> Option<u64> {
        self.rows.read().get(&id).map(|r| r.version())
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    /// Number of reads answered from the result cache
    pub fn cache_hits(&self) -> u64 {
        self.cache.as_ref().map_or(0, |c| c.hits())
    }

    fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate();
        }
    }
}
