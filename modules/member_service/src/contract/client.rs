//! Native client trait for inter-module communication
//!
//! This trait defines the API that other modules use to interact with the member service.
//! NO HTTP - direct function calls.

use super::{
    error::MemberError,
    model::{Member, MemberGraph, MemberId, MemberSummary, Team, TeamId},
};
use crate::domain::page::{Page, PageRequest, Slice};
use crate::domain::query::Query;

/// Member service API for inter-module communication
pub trait MemberApi: Send + Sync {
    // ===== Team Operations =====

    /// Insert a new team or update a persisted one
    fn save_team(&self, team: &Team) -> Result<Team, MemberError>;

    /// Get a team by identity
    fn get_team(&self, id: TeamId) -> Result<Team, MemberError>;

    /// Members referencing a team
    fn team_members(&self, team_id: TeamId) -> Result<Vec<Member>, MemberError>;

    // ===== Member Operations =====

    /// Insert a new member or update a persisted one
    fn save_member(&self, member: &Member) -> Result<Member, MemberError>;

    /// Get a member by identity
    fn get_member(&self, id: MemberId) -> Result<Member, MemberError>;

    /// Get the single member with the given username
    fn get_member_by_username(&self, username: &str) -> Result<Member, MemberError>;

    /// Delete a member
    fn delete_member(&self, id: MemberId) -> Result<(), MemberError>;

    /// Run a query descriptor against members
    fn query_members(&self, query: &Query) -> Result<Vec<Member>, MemberError>;

    /// Page of all members
    fn list_members(&self, request: &PageRequest) -> Result<Page<Member>, MemberError>;

    /// Members of `age` without a total count
    fn slice_by_age(&self, age: u32, request: &PageRequest) -> Result<Slice<Member>, MemberError>;

    /// Page of member summaries with team names
    fn list_member_summaries(
        &self,
        request: &PageRequest,
    ) -> Result<Page<MemberSummary>, MemberError>;

    /// Member named `username` with its team fetched
    fn member_graph(&self, username: &str) -> Result<Vec<MemberGraph>, MemberError>;

    /// Increment the age of every member aged `age` or older
    fn bulk_age_plus(&self, age: u32) -> Result<usize, MemberError>;
}
