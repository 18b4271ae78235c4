//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs

use super::page::{Page, PageError, PageRequest, Slice};
use super::query::{Condition, Predicate, Query, QueryError};
use crate::contract::MemberError;
use thiserror::Error;

/// Storage-level failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u64 },

    #[error("{0}")]
    Constraint(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Page(#[from] PageError),

    #[error("{0}")]
    Unavailable(String),
}

impl From<StoreError> for MemberError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => MemberError::not_found(entity, id),
            StoreError::Constraint(reason) => MemberError::constraint(reason),
            StoreError::Query(e) => MemberError::constraint(e.to_string()),
            StoreError::Page(e) => MemberError::constraint(e.to_string()),
            StoreError::Unavailable(reason) => MemberError::Unavailable { reason },
        }
    }
}

impl From<QueryError> for MemberError {
    fn from(err: QueryError) -> Self {
        MemberError::constraint(err.to_string())
    }
}

impl From<PageError> for MemberError {
    fn from(err: PageError) -> Self {
        MemberError::constraint(err.to_string())
    }
}

/// Entity access for one record type
///
/// All operations are synchronous. Lock-mode hints travel inside [`Query`]
/// and are handed to the backing store as given.
pub trait Repository<T>: Send + Sync {
    /// Persist a new entity; the store assigns identity and audit columns
    fn insert(&self, entity: &T) -> Result<T, StoreError>;

    /// Replace an existing entity with the same identity
    fn update(&self, entity: &T) -> Result<T, StoreError>;

    /// Find by identity
    fn find_by_id(&self, id: u64) -> Result<Option<T>, StoreError>;

    /// Filtered, sorted, optionally windowed read
    fn find_all(&self, query: &Query) -> Result<Vec<T>, StoreError>;

    /// Number of rows matching `predicate`
    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError>;

    /// Remove by identity
    fn delete(&self, id: u64) -> Result<T, StoreError>;

    /// Remove every row, returning how many were removed
    fn delete_all(&self) -> Result<usize, StoreError>;

    /// Apply `transform` to every row matching `predicate` as one operation.
    ///
    /// Copies previously returned to callers are NOT refreshed: after a bulk
    /// update the caller must re-read to observe new values.
    fn bulk_update(&self, predicate: &Predicate, transform: &dyn Fn(&mut T))
        -> Result<usize, StoreError>;

    /// Batch lookup by identity, in identity order
    fn find_by_ids(&self, ids: &[u64]) -> Result<Vec<T>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_all(&Query::filter(Condition::is_in("id", ids.iter().copied())))
    }

    /// Windowed content plus an unbounded count over the same predicate
    fn find_page(&self, query: &Query, request: &PageRequest) -> Result<Page<T>, StoreError> {
        let content = self.find_all(&paged(query, request))?;
        let total = self.count(&query.predicate)?;
        Ok(Page::new(content, request.clone(), total))
    }

    /// One read of `size + 1` rows; no count
    fn find_slice(&self, query: &Query, request: &PageRequest) -> Result<Slice<T>, StoreError> {
        let mut windowed = paged(query, request);
        windowed.window = Some(request.window().overfetch());
        let rows = self.find_all(&windowed)?;
        Ok(Slice::from_overfetch(rows, request.clone()))
    }
}

/// The query restricted to the request's window; the request's sort, when
/// present, replaces the query's own
fn paged(query: &Query, request: &PageRequest) -> Query {
    let mut q = query.clone();
    if !request.sort().is_unsorted() {
        q.sort = request.sort().clone();
    }
    q.window = Some(request.window());
    q
}
