//! Domain service - business logic orchestration

use super::page::{Page, PageRequest, Slice, Window};
use super::query::{Condition, Predicate, Query};
use super::repository::Repository;
use super::validation::{validate_member, validate_team};
use crate::contract::{
    Association, Fetch, Member, MemberError, MemberGraph, MemberId, MemberProjection,
    MemberSummary, Team, TeamId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Domain service for members and teams
pub struct Service {
    members: Arc<dyn Repository<Member>>,
    teams: Arc<dyn Repository<Team>>,
}

impl Service {
    /// Create a new service instance
    pub fn new(members: Arc<dyn Repository<Member>>, teams: Arc<dyn Repository<Team>>) -> Self {
        Self { members, teams }
    }

    // ===== Team Operations =====

    /// Insert a new team or update a persisted one
    pub fn save_team(&self, team: &Team) -> Result<Team, MemberError> {
        validate_team(team)?;
        let saved = if team.is_new() {
            self.teams.insert(team)?
        } else {
            self.teams.update(team)?
        };
        info!(team_id = saved.id, name = %saved.name, "team saved");
        Ok(saved)
    }

    pub fn find_team(&self, id: TeamId) -> Result<Team, MemberError> {
        self.teams
            .find_by_id(id)?
            .ok_or_else(|| MemberError::not_found("team", id))
    }

    pub fn find_all_teams(&self) -> Result<Vec<Team>, MemberError> {
        Ok(self.teams.find_all(&Query::all())?)
    }

    /// Delete a team; fails while members still reference it
    pub fn delete_team(&self, id: TeamId) -> Result<(), MemberError> {
        self.teams.delete(id)?;
        info!(team_id = id, "team deleted");
        Ok(())
    }

    pub fn count_teams(&self) -> Result<u64, MemberError> {
        Ok(self.teams.count(&Predicate::all())?)
    }

    // ===== Member CRUD =====

    /// Insert a new member or update a persisted one
    pub fn save_member(&self, member: &Member) -> Result<Member, MemberError> {
        if member.is_new() {
            validate_member(member)?;
            let saved = self.members.insert(member)?;
            info!(member_id = saved.id, username = %saved.username, "member inserted");
            Ok(saved)
        } else {
            self.update_member(member)
        }
    }

    pub fn update_member(&self, member: &Member) -> Result<Member, MemberError> {
        validate_member(member)?;
        let saved = self.members.update(member)?;
        info!(member_id = saved.id, version = saved.version, "member updated");
        Ok(saved)
    }

    pub fn find_member(&self, id: MemberId) -> Result<Member, MemberError> {
        self.members
            .find_by_id(id)?
            .ok_or_else(|| MemberError::not_found("member", id))
    }

    pub fn find_all_members(&self) -> Result<Vec<Member>, MemberError> {
        self.query_members(&Query::all())
    }

    pub fn delete_member(&self, id: MemberId) -> Result<(), MemberError> {
        self.members.delete(id)?;
        info!(member_id = id, "member deleted");
        Ok(())
    }

    pub fn delete_all_members(&self) -> Result<usize, MemberError> {
        Ok(self.members.delete_all()?)
    }

    pub fn count_members(&self) -> Result<u64, MemberError> {
        self.count_members_matching(&Predicate::all())
    }

    /// Run an arbitrary descriptor against members
    pub fn query_members(&self, query: &Query) -> Result<Vec<Member>, MemberError> {
        debug!(query = ?query, "member query");
        Ok(self.members.find_all(query)?)
    }

    pub fn count_members_matching(&self, predicate: &Predicate) -> Result<u64, MemberError> {
        Ok(self.members.count(predicate)?)
    }

    // ===== Derived Finds =====

    pub fn find_by_username_and_age_greater_than(
        &self,
        username: &str,
        age: u32,
    ) -> Result<Vec<Member>, MemberError> {
        self.query_members(
            &Query::all()
                .and(Condition::eq("username", username))
                .and(Condition::gt("age", age)),
        )
    }

    pub fn find_by_username(&self, username: &str) -> Result<Vec<Member>, MemberError> {
        self.query_members(&Query::filter(Condition::eq("username", username)))
    }

    pub fn find_user(&self, username: &str, age: u32) -> Result<Vec<Member>, MemberError> {
        self.query_members(
            &Query::all()
                .and(Condition::eq("username", username))
                .and(Condition::eq("age", age)),
        )
    }

    pub fn find_by_names<I, S>(&self, names: I) -> Result<Vec<Member>, MemberError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.query_members(&Query::filter(Condition::is_in("username", names)))
    }

    /// Usernames matching a LIKE pattern (`%` any run, `_` one character)
    pub fn find_by_username_like(&self, pattern: &str) -> Result<Vec<Member>, MemberError> {
        self.query_members(&Query::filter(Condition::like("username", pattern)))
    }

    /// Every username, in insertion order
    pub fn find_username_list(&self) -> Result<Vec<String>, MemberError> {
        Ok(self
            .find_all_members()?
            .into_iter()
            .map(|m| m.username)
            .collect())
    }

    /// Single-result find: not-found when nothing matches, constraint
    /// violation when more than one row matches
    pub fn find_member_by_username(&self, username: &str) -> Result<Member, MemberError> {
        self.find_optional_by_username(username)?
            .ok_or_else(|| MemberError::not_found("member", username))
    }

    /// Optional single-result find; more than one match is still an error
    pub fn find_optional_by_username(&self, username: &str) -> Result<Option<Member>, MemberError> {
        let query = Query::filter(Condition::eq("username", username))
            .window(Window::new(0, 2)?);
        let mut found = self.query_members(&query)?;
        if found.len() > 1 {
            return Err(MemberError::constraint(format!(
                "non-unique result: more than one member named '{username}'"
            )));
        }
        Ok(found.pop())
    }

    // ===== Paging =====

    /// Members of `age`, windowed, with an independent total count
    pub fn find_page_by_age(
        &self,
        age: u32,
        request: &PageRequest,
    ) -> Result<Page<Member>, MemberError> {
        let query = Query::filter(Condition::eq("age", age));
        Ok(self.members.find_page(&query, request)?)
    }

    /// Members of `age`, windowed, next-page existence by over-fetch
    pub fn find_slice_by_age(
        &self,
        age: u32,
        request: &PageRequest,
    ) -> Result<Slice<Member>, MemberError> {
        let query = Query::filter(Condition::eq("age", age));
        Ok(self.members.find_slice(&query, request)?)
    }

    /// Members of `age`, windowed, no count and no next-page lookahead
    pub fn find_list_by_age(
        &self,
        age: u32,
        request: &PageRequest,
    ) -> Result<Vec<Member>, MemberError> {
        let query = Query::filter(Condition::eq("age", age))
            .sorted(request.sort().clone())
            .window(request.window());
        self.query_members(&query)
    }

    pub fn find_top3_by_age(&self, age: u32) -> Result<Vec<Member>, MemberError> {
        let query = Query::filter(Condition::eq("age", age)).window(Window::new(0, 3)?);
        self.query_members(&query)
    }

    pub fn find_members_page(&self, request: &PageRequest) -> Result<Page<Member>, MemberError> {
        Ok(self.members.find_page(&Query::all(), request)?)
    }

    /// Page of members reduced to id, username and team name
    pub fn find_member_summary_page(
        &self,
        request: &PageRequest,
    ) -> Result<Page<MemberSummary>, MemberError> {
        let page = self.members.find_page(&Query::all(), request)?;
        let teams = self.team_index(page.content())?;
        Ok(page.map(|m| {
            let team = m.team_id.and_then(|id| teams.get(&id));
            MemberSummary::project(&m, team)
        }))
    }

    // ===== Bulk Updates =====

    /// Increment the age of every member aged `age` or older.
    ///
    /// Member values read before this call are stale afterwards and are not
    /// refreshed; re-read them (see [`Service::is_stale`]).
    pub fn bulk_age_plus(&self, age: u32) -> Result<usize, MemberError> {
        self.bulk_update_members(&Predicate::from(Condition::ge("age", age)), &|m| {
            m.age = m.age.saturating_add(1)
        })
    }

    /// Apply `transform` to every member matching `predicate` in one step.
    ///
    /// Returns the number of affected members. Previously read member values
    /// are stale afterwards; callers must re-read them.
    pub fn bulk_update_members(
        &self,
        predicate: &Predicate,
        transform: &dyn Fn(&mut Member),
    ) -> Result<usize, MemberError> {
        let affected = self.members.bulk_update(predicate, transform)?;
        info!(affected, predicate = ?predicate, "bulk member update");
        Ok(affected)
    }

    /// Whether a held member copy no longer reflects the stored row
    pub fn is_stale(&self, member: &Member) -> Result<bool, MemberError> {
        let stored = self.members.find_by_id(member.id)?;
        Ok(match stored {
            Some(stored) => stored.version != member.version,
            None => true,
        })
    }

    // ===== Associations =====

    /// Move a member to another team.
    ///
    /// The reference is rewritten on the stored row under one write lock, so
    /// writes made by others since the caller last read the member are kept.
    pub fn change_team(&self, member_id: MemberId, team_id: TeamId) -> Result<Member, MemberError> {
        let by_id = Predicate::from(Condition::eq("id", member_id));
        let affected = self
            .members
            .bulk_update(&by_id, &|m| m.team_id = Some(team_id))?;
        if affected == 0 {
            return Err(MemberError::not_found("member", member_id));
        }
        info!(member_id, team_id, "member changed team");
        self.find_member(member_id)
    }

    /// Members of a team, derived from their team reference
    pub fn team_members(&self, team_id: TeamId) -> Result<Vec<Member>, MemberError> {
        self.find_team(team_id)?;
        self.query_members(&Query::filter(Condition::eq("team_id", team_id)))
    }

    /// Explicitly load the team a member references
    pub fn load_team(&self, member: &Member) -> Result<Option<Team>, MemberError> {
        match member.team_id {
            None => Ok(None),
            Some(id) => match self.teams.find_by_id(id)? {
                Some(team) => Ok(Some(team)),
                None => {
                    warn!(member_id = member.id, team_id = id, "dangling team reference");
                    Err(MemberError::not_found("team", id))
                }
            },
        }
    }

    /// Every member with its team association resolved per `fetch`
    pub fn find_members_with_team(&self, fetch: Fetch) -> Result<Vec<MemberGraph>, MemberError> {
        let members = self.find_all_members()?;
        self.attach(members, fetch)
    }

    /// Members named `username`, team fetched in the same read
    pub fn find_entity_graph_by_username(
        &self,
        username: &str,
    ) -> Result<Vec<MemberGraph>, MemberError> {
        let members = self.find_by_username(username)?;
        self.attach(members, Fetch::Join)
    }

    // ===== Projections =====

    /// Members named `username`, reduced to projection `P`
    pub fn find_projections_by_username<P: MemberProjection>(
        &self,
        username: &str,
    ) -> Result<Vec<P>, MemberError> {
        let members = self.find_by_username(username)?;
        self.project(members)
    }

    /// Summaries of members that belong to a team (inner join)
    pub fn find_member_summaries(&self) -> Result<Vec<MemberSummary>, MemberError> {
        let members: Vec<Member> = self
            .find_all_members()?
            .into_iter()
            .filter(|m| m.team_id.is_some())
            .collect();
        self.project(members)
    }

    // ===== Helper Methods =====

    fn project<P: MemberProjection>(&self, members: Vec<Member>) -> Result<Vec<P>, MemberError> {
        if !P::NEEDS_TEAM {
            return Ok(members.iter().map(|m| P::project(m, None)).collect());
        }
        let teams = self.team_index(&members)?;
        Ok(members
            .iter()
            .map(|m| P::project(m, m.team_id.and_then(|id| teams.get(&id))))
            .collect())
    }

    fn attach(&self, members: Vec<Member>, fetch: Fetch) -> Result<Vec<MemberGraph>, MemberError> {
        let teams = match fetch {
            Fetch::Join => self.team_index(&members)?,
            Fetch::Lazy => HashMap::new(),
        };
        Ok(members
            .into_iter()
            .map(|member| {
                let team = match (member.team_id, fetch) {
                    (None, _) => Association::Absent,
                    (Some(id), Fetch::Lazy) => Association::Deferred(id),
                    (Some(id), Fetch::Join) => teams
                        .get(&id)
                        .cloned()
                        .map_or(Association::Deferred(id), Association::Loaded),
                };
                MemberGraph { member, team }
            })
            .collect())
    }

    /// Batch-load the teams referenced by `members`
    fn team_index(&self, members: &[Member]) -> Result<HashMap<TeamId, Team>, MemberError> {
        let mut ids: Vec<TeamId> = members.iter().filter_map(|m| m.team_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(self
            .teams
            .find_by_ids(&ids)?
            .into_iter()
            .map(|t| (t.id, t))
            .collect())
    }
}
