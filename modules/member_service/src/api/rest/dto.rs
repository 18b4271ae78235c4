//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ===== Member DTOs =====

/// Member response DTO
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberDto {
    /// Member identity
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "member1")]
    pub username: String,

    #[schema(example = 10)]
    pub age: u32,

    /// Referenced team, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<u64>,

    /// Row version, bumped on every write
    pub version: u64,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub last_modified_by: Option<String>,
}

/// Member summary DTO with the team name
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberSummaryDto {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "member1")]
    pub username: String,

    /// Name of the member's team; absent when the member has none
    #[schema(example = "teamA")]
    pub team_name: Option<String>,
}

// ===== Paging =====

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDto<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based page number
    pub number: u64,
    pub size: u64,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub has_next: bool,
    pub has_previous: bool,
}
