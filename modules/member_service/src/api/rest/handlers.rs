//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::config::Config;
use crate::contract::MemberError;
use crate::domain::page::PageRequest;
use crate::domain::query::{Direction, Order, Sort};
use crate::domain::Service;
use axum::{extract::Path, Json};
use std::sync::Arc;

// ===== Paging Parameters =====

/// Build a page request from `page`, `size` and repeatable `sort` parameters
///
/// `sort` takes the form `prop[,prop...][,asc|desc]`; the direction applies to
/// every property in the same parameter and defaults to ascending.
pub fn parse_page_request(raw: Option<&str>, config: &Config) -> Result<PageRequest, Problem> {
    let mut page = 0;
    let mut size = None;
    let mut sort = Sort::unsorted();

    for (key, value) in url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        match &*key {
            "page" => page = parse_number("page", &value)?,
            "size" => size = Some(parse_number("size", &value)?),
            "sort" => {
                for order in parse_sort(&value)? {
                    sort = sort.then(order);
                }
            }
            _ => {}
        }
    }

    PageRequest::sorted(page, config.page_size(size), sort)
        .map_err(|e| map_domain_error(MemberError::from(e)))
}

fn parse_number(name: &str, value: &str) -> Result<u64, Problem> {
    value.trim().parse().map_err(|_| {
        Problem::bad_request(format!(
            "'{name}' must be a non-negative integer, got '{value}'"
        ))
    })
}

/// Parse one `sort` parameter value
pub fn parse_sort(value: &str) -> Result<Vec<Order>, Problem> {
    let mut parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let direction = match parts.last().map(|p| p.parse::<Direction>()) {
        Some(Ok(direction)) => {
            parts.pop();
            direction
        }
        _ => Direction::Asc,
    };

    if parts.is_empty() || parts.iter().any(|p| p.is_empty()) {
        return Err(Problem::bad_request(format!(
            "invalid sort parameter '{value}'"
        )));
    }

    Ok(parts
        .into_iter()
        .map(|field| match direction {
            Direction::Asc => Order::asc(field),
            Direction::Desc => Order::desc(field),
        })
        .collect())
}

// ===== Member Handlers =====

/// Username of a member, as plain text
pub async fn get_member_username(
    service: Arc<Service>,
    Path(id): Path<u64>,
) -> Result<String, Problem> {
    let member = service.find_member(id).map_err(map_domain_error)?;
    Ok(member.username)
}

/// Page of members
pub async fn list_members(
    service: Arc<Service>,
    config: Arc<Config>,
    raw_query: Option<String>,
) -> Result<Json<PageDto<MemberDto>>, Problem> {
    let request = parse_page_request(raw_query.as_deref(), &config)?;
    let page = service
        .find_members_page(&request)
        .map_err(map_domain_error)?;
    Ok(Json(page.into()))
}

/// Page of member summaries with team names
pub async fn list_member_summaries(
    service: Arc<Service>,
    config: Arc<Config>,
    raw_query: Option<String>,
) -> Result<Json<PageDto<MemberSummaryDto>>, Problem> {
    let request = parse_page_request(raw_query.as_deref(), &config)?;
    let page = service
        .find_member_summary_page(&request)
        .map_err(map_domain_error)?;
    Ok(Json(page.into()))
}

// ===== Team Handlers =====

/// Members of a team
pub async fn list_team_members(
    service: Arc<Service>,
    Path(team_id): Path<u64>,
) -> Result<Json<Vec<MemberDto>>, Problem> {
    let members = service.team_members(team_id).map_err(map_domain_error)?;
    Ok(Json(members.into_iter().map(MemberDto::from).collect()))
}
