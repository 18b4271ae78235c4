//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    Member, MemberApi, MemberError, MemberGraph, MemberId, MemberSummary, Team, TeamId,
};
use crate::domain::page::{Page, PageRequest, Slice};
use crate::domain::query::Query;
use crate::domain::Service;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
///
/// This client is used for in-process communication without HTTP overhead.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

impl MemberApi for NativeClient {
    fn save_team(&self, team: &Team) -> Result<Team, MemberError> {
        self.service.save_team(team)
    }

    fn get_team(&self, id: TeamId) -> Result<Team, MemberError> {
        self.service.find_team(id)
    }

    fn team_members(&self, team_id: TeamId) -> Result<Vec<Member>, MemberError> {
        self.service.team_members(team_id)
    }

    fn save_member(&self, member: &Member) -> Result<Member, MemberError> {
        self.service.save_member(member)
    }

    fn get_member(&self, id: MemberId) -> Result<Member, MemberError> {
        self.service.find_member(id)
    }

    fn get_member_by_username(&self, username: &str) -> Result<Member, MemberError> {
        self.service.find_member_by_username(username)
    }

    fn delete_member(&self, id: MemberId) -> Result<(), MemberError> {
        self.service.delete_member(id)
    }

    fn query_members(&self, query: &Query) -> Result<Vec<Member>, MemberError> {
        self.service.query_members(query)
    }

    fn list_members(&self, request: &PageRequest) -> Result<Page<Member>, MemberError> {
        self.service.find_members_page(request)
    }

    fn slice_by_age(&self, age: u32, request: &PageRequest) -> Result<Slice<Member>, MemberError> {
        self.service.find_slice_by_age(age, request)
    }

    fn list_member_summaries(
        &self,
        request: &PageRequest,
    ) -> Result<Page<MemberSummary>, MemberError> {
        self.service.find_member_summary_page(request)
    }

    fn member_graph(&self, username: &str) -> Result<Vec<MemberGraph>, MemberError> {
        self.service.find_entity_graph_by_username(username)
    }

    fn bulk_age_plus(&self, age: u32) -> Result<usize, MemberError> {
        self.service.bulk_age_plus(age)
    }
}
