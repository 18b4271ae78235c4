//! Contract models for member service
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};

/// Member identity, assigned by the store on insert
pub type MemberId = u64;

/// Team identity, assigned by the store on insert
pub type TeamId = u64;

/// Audit columns stamped by the store on insert and update
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Audit {
    /// Creation timestamp (never changes after insert)
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp
    pub updated_at: Option<DateTime<Utc>>,
    /// Auditor that created the row
    pub created_by: Option<String>,
    /// Auditor that last modified the row
    pub last_modified_by: Option<String>,
}

/// Team - the "one" side of the member/team association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Identity (`0` until persisted)
    pub id: TeamId,
    /// Team name
    pub name: String,
    /// Row version, bumped on every update
    pub version: u64,
    /// Audit columns
    pub audit: Audit,
}

impl Team {
    /// Create a transient team
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            version: 0,
            audit: Audit::default(),
        }
    }

    /// Whether this team has not been persisted yet
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

/// Member - the "many" side, holding the team reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Identity (`0` until persisted)
    pub id: MemberId,
    pub username: String,
    pub age: u32,
    /// Foreign key to the owning team
    pub team_id: Option<TeamId>,
    /// Row version, bumped on every update (including bulk updates)
    pub version: u64,
    /// Audit columns
    pub audit: Audit,
}

impl Member {
    /// Create a transient member without age or team
    pub fn new(username: impl Into<String>) -> Self {
        Self::with_age(username, 0)
    }

    /// Create a transient member with an age
    pub fn with_age(username: impl Into<String>, age: u32) -> Self {
        Self {
            id: 0,
            username: username.into(),
            age,
            team_id: None,
            version: 0,
            audit: Audit::default(),
        }
    }

    /// Create a transient member that belongs to a team
    pub fn with_team(username: impl Into<String>, age: u32, team: &Team) -> Self {
        Self {
            team_id: Some(team.id),
            ..Self::with_age(username, age)
        }
    }

    /// Whether this member has not been persisted yet
    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}

/// How the team association is fetched together with a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fetch {
    /// Leave the team as a deferred handle
    #[default]
    Lazy,
    /// Resolve the team in the same read
    Join,
}

/// Team association of a loaded member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    /// Member has no team
    Absent,
    /// Team not loaded yet; resolve with `Service::load_team`
    Deferred(TeamId),
    /// Team resolved in the same read
    Loaded(Team),
}

impl Association {
    /// Identity of the referenced team, loaded or not
    pub fn team_id(&self) -> Option<TeamId> {
        match self {
            Self::Absent => None,
            Self::Deferred(id) => Some(*id),
            Self::Loaded(team) => Some(team.id),
        }
    }

    /// The resolved team, if it was fetched
    pub fn loaded(&self) -> Option<&Team> {
        match self {
            Self::Loaded(team) => Some(team),
            _ => None,
        }
    }
}

/// Member together with its team association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberGraph {
    pub member: Member,
    pub team: Association,
}

// ===== Projections =====

/// A reduced-shape view of a member
pub trait MemberProjection: Sized {
    /// Whether the projection reads the member's team
    const NEEDS_TEAM: bool = false;

    /// Build the projection from a member and, when requested, its team
    fn project(member: &Member, team: Option<&Team>) -> Self;
}

/// Closed projection exposing only the username
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameOnly {
    pub username: String,
}

impl MemberProjection for UsernameOnly {
    fn project(member: &Member, _team: Option<&Team>) -> Self {
        Self {
            username: member.username.clone(),
        }
    }
}

/// Class-based projection exposing username and age
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameAge {
    pub username: String,
    pub age: u32,
}

impl MemberProjection for UsernameAge {
    fn project(member: &Member, _team: Option<&Team>) -> Self {
        Self {
            username: member.username.clone(),
            age: member.age,
        }
    }
}

/// Member summary with the related team name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSummary {
    pub id: MemberId,
    pub username: String,
    pub team_name: Option<String>,
}

impl MemberProjection for MemberSummary {
    const NEEDS_TEAM: bool = true;

    fn project(member: &Member, team: Option<&Team>) -> Self {
        Self {
            id: member.id,
            username: member.username.clone(),
            team_name: team.map(|t| t.name.clone()),
        }
    }
}
