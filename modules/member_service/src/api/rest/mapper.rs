//! Mapper implementations for converting contract models and pages into DTOs

use super::dto::*;
use crate::contract;
use crate::domain::page::Page;

// ===== Member conversions =====

impl From<contract::Member> for MemberDto {
    fn from(member: contract::Member) -> Self {
        Self {
            id: member.id,
            username: member.username,
            age: member.age,
            team_id: member.team_id,
            version: member.version,
            created_at: member.audit.created_at,
            updated_at: member.audit.updated_at,
            created_by: member.audit.created_by,
            last_modified_by: member.audit.last_modified_by,
        }
    }
}

impl From<contract::MemberSummary> for MemberSummaryDto {
    fn from(summary: contract::MemberSummary) -> Self {
        Self {
            id: summary.id,
            username: summary.username,
            team_name: summary.team_name,
        }
    }
}

// ===== Page conversions =====

impl<T, D: From<T>> From<Page<T>> for PageDto<D> {
    fn from(page: Page<T>) -> Self {
        Self {
            total_elements: page.total_elements(),
            total_pages: page.total_pages(),
            number: page.number(),
            size: page.size(),
            number_of_elements: page.number_of_elements(),
            first: page.is_first(),
            last: page.is_last(),
            has_next: page.has_next(),
            has_previous: page.has_previous(),
            content: page.into_content().into_iter().map(D::from).collect(),
        }
    }
}
