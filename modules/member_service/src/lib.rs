//! Member Service Module
//!
//! Paginated entity access for members and teams: an in-memory entity store,
//! a structured query builder with derived finders, page and slice reads,
//! bulk updates, projections and an HTTP surface.

// Public exports
pub mod contract;
pub use contract::{
    client::MemberApi, error::MemberError, Association, Fetch, Member, MemberGraph,
    MemberProjection, MemberSummary, Team, UsernameAge, UsernameOnly,
};

pub mod module;
pub use module::MemberServiceModule;

pub mod config;
pub use config::{AuditorConfig, Config, ConfigError};

pub mod domain;
pub use domain::{Page, PageRequest, Slice};

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod infra;
