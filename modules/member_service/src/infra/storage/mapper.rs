//! Field mappers
//!
//! Maps query field names to contract model columns so the query builder can
//! address them, and exposes identity/version/audit to the entity store.

use super::table::Record;
use crate::contract::{Audit, Member, Team};
use crate::domain::query::{Fields, Value};

fn audit_value(audit: &Audit, field: &str) -> Value {
    match field {
        "created_at" => audit.created_at.map(|t| t.timestamp_millis()).into(),
        "updated_at" => audit.updated_at.map(|t| t.timestamp_millis()).into(),
        "created_by" => audit.created_by.clone().into(),
        "last_modified_by" => audit.last_modified_by.clone().into(),
        _ => Value::Null,
    }
}

// ===== Member =====

impl Fields for Member {
    const ENTITY: &'static str = "member";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "username",
        "age",
        "team_id",
        "version",
        "created_at",
        "updated_at",
        "created_by",
        "last_modified_by",
    ];

    fn value(&self, field: &str) -> Value {
        match field {
            "id" => self.id.into(),
            "username" => self.username.as_str().into(),
            "age" => self.age.into(),
            "team_id" => self.team_id.into(),
            "version" => self.version.into(),
            other => audit_value(&self.audit, other),
        }
    }
}

impl Record for Member {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}

// ===== Team =====

impl Fields for Team {
    const ENTITY: &'static str = "team";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "version",
        "created_at",
        "updated_at",
        "created_by",
        "last_modified_by",
    ];

    fn value(&self, field: &str) -> Value {
        match field {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "version" => self.version.into(),
            other => audit_value(&self.audit, other),
        }
    }
}

impl Record for Team {
    fn id(&self) -> u64 {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = id;
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }
}
