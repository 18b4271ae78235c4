//! Input validation for members and teams

use crate::contract::{Member, MemberError, Team};

/// Maximum length of usernames and team names, in characters
pub const MAX_NAME_LEN: usize = 255;

/// Validate a username or team name
///
/// Names must be non-empty, must not be blank and must not carry leading or
/// trailing whitespace.
pub fn validate_name(kind: &str, name: &str) -> Result<(), MemberError> {
    if name.trim().is_empty() {
        return Err(MemberError::constraint(format!("{kind} cannot be empty")));
    }

    if name.trim() != name {
        return Err(MemberError::constraint(format!(
            "{kind} '{name}' must not start or end with whitespace"
        )));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(MemberError::constraint(format!(
            "{kind} must be at most {MAX_NAME_LEN} characters"
        )));
    }

    Ok(())
}

pub fn validate_member(member: &Member) -> Result<(), MemberError> {
    validate_name("username", &member.username)
}

pub fn validate_team(team: &Team) -> Result<(), MemberError> {
    validate_name("team name", &team.name)
}
