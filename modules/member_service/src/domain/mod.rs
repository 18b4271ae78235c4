//! Domain layer - business logic and services

pub mod audit;
pub mod page;
pub mod query;
pub mod repository;
pub mod service;
pub mod validation;

pub use audit::{AuditorProvider, Auditing, FixedAuditor, NoAuditor, RandomAuditor};
pub use page::{Page, PageError, PageRequest, Slice, Window};
pub use query::{Condition, Direction, LockMode, Op, Order, Predicate, Query, QueryError, Sort};
pub use repository::{Repository, StoreError};
pub use service::Service;
