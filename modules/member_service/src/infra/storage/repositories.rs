//! In-memory repository implementations

use super::table::{Table, TableRead};
use crate::contract::{Member, MemberError, Team};
use crate::domain::audit::Auditing;
use crate::domain::query::{Predicate, Query};
use crate::domain::repository::{Repository, StoreError};
use crate::domain::validation::validate_member;
use std::sync::Arc;

/// Member and team tables sharing one auditing policy
#[derive(Clone)]
pub struct MemoryStore {
    members: Arc<Table<Member>>,
    teams: Arc<Table<Team>>,
}

impl MemoryStore {
    pub fn new(auditing: Auditing, cache_capacity: usize) -> Self {
        Self {
            members: Arc::new(Table::new(auditing.clone(), cache_capacity)),
            teams: Arc::new(Table::new(auditing, cache_capacity)),
        }
    }

    pub fn member_repository(&self) -> MemoryMemberRepository {
        MemoryMemberRepository {
            members: self.members.clone(),
            teams: self.teams.clone(),
        }
    }

    pub fn team_repository(&self) -> MemoryTeamRepository {
        MemoryTeamRepository {
            members: self.members.clone(),
            teams: self.teams.clone(),
        }
    }

    pub fn members(&self) -> &Table<Member> {
        &self.members
    }

    pub fn teams(&self) -> &Table<Team> {
        &self.teams
    }
}

/// A member's team reference must point at a stored team
fn ensure_team(teams: &TableRead<'_, Team>, member: &Member) -> Result<(), StoreError> {
    match member.team_id {
        Some(team_id) if !teams.contains(team_id) => Err(StoreError::Constraint(format!(
            "member '{}' references missing team {}",
            member.username, team_id
        ))),
        _ => Ok(()),
    }
}

/// Rows written by a bulk transform obey the same rules as single saves
fn ensure_valid(member: &Member) -> Result<(), StoreError> {
    validate_member(member).map_err(|e| match e {
        MemberError::ConstraintViolation { reason } => StoreError::Constraint(reason),
        other => StoreError::Constraint(other.to_string()),
    })
}

// ===== Member Repository =====

pub struct MemoryMemberRepository {
    members: Arc<Table<Member>>,
    teams: Arc<Table<Team>>,
}

impl Repository<Member> for MemoryMemberRepository {
    fn insert(&self, member: &Member) -> Result<Member, StoreError> {
        let teams = self.teams.read();
        self.members.insert_checked(member, |m| ensure_team(&teams, m))
    }

    fn update(&self, member: &Member) -> Result<Member, StoreError> {
        let teams = self.teams.read();
        self.members.update_checked(member, |m| ensure_team(&teams, m))
    }

    fn find_by_id(&self, id: u64) -> Result<Option<Member>, StoreError> {
        Ok(self.members.find_by_id(id))
    }

    fn find_all(&self, query: &Query) -> Result<Vec<Member>, StoreError> {
        self.members.find_all(query)
    }

    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        self.members.count(predicate)
    }

    fn delete(&self, id: u64) -> Result<Member, StoreError> {
        self.members.delete_checked(id, |_| Ok(()))
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        self.members.delete_all_checked(|_| Ok(()))
    }

    fn bulk_update(
        &self,
        predicate: &Predicate,
        transform: &dyn Fn(&mut Member),
    ) -> Result<usize, StoreError> {
        let teams = self.teams.read();
        self.members.bulk_update_checked(predicate, transform, |m| {
            ensure_valid(m)?;
            ensure_team(&teams, m)
        })
    }
}

// ===== Team Repository =====

pub struct MemoryTeamRepository {
    members: Arc<Table<Member>>,
    teams: Arc<Table<Team>>,
}

impl MemoryTeamRepository {
    /// Deleting a team never cascades to its members
    fn ensure_unreferenced(&self, team: &Team) -> Result<(), StoreError> {
        let members = self.members.read();
        let referencing = members
            .iter()
            .filter(|m| m.team_id == Some(team.id))
            .count();
        if referencing > 0 {
            return Err(StoreError::Constraint(format!(
                "team '{}' is still referenced by {} member(s)",
                team.name, referencing
            )));
        }
        Ok(())
    }
}

impl Repository<Team> for MemoryTeamRepository {
    fn insert(&self, team: &Team) -> Result<Team, StoreError> {
        self.teams.insert_checked(team, |_| Ok(()))
    }

    fn update(&self, team: &Team) -> Result<Team, StoreError> {
        self.teams.update_checked(team, |_| Ok(()))
    }

    fn find_by_id(&self, id: u64) -> Result<Option<Team>, StoreError> {
        Ok(self.teams.find_by_id(id))
    }

    fn find_all(&self, query: &Query) -> Result<Vec<Team>, StoreError> {
        self.teams.find_all(query)
    }

    fn count(&self, predicate: &Predicate) -> Result<u64, StoreError> {
        self.teams.count(predicate)
    }

    fn delete(&self, id: u64) -> Result<Team, StoreError> {
        self.teams.delete_checked(id, |team| self.ensure_unreferenced(team))
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        self.teams.delete_all_checked(|team| self.ensure_unreferenced(team))
    }

    fn bulk_update(
        &self,
        predicate: &Predicate,
        transform: &dyn Fn(&mut Team),
    ) -> Result<usize, StoreError> {
        self.teams.bulk_update_checked(predicate, transform, |_| Ok(()))
    }
}
