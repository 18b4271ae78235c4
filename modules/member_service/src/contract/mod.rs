//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::MemberApi;
pub use error::MemberError;
pub use model::{
    Association, Audit, Fetch, Member, MemberGraph, MemberId, MemberProjection, MemberSummary,
    Team, TeamId, UsernameAge, UsernameOnly,
};
