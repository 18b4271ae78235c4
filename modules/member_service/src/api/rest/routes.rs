//! Route registration

use super::{dto::*, error::Problem, handlers};
use crate::config::Config;
use crate::domain::Service;
use axum::{
    extract::{Path, RawQuery},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

/// Register all REST routes on `router`
pub fn register_routes(router: Router, service: Arc<Service>, config: Arc<Config>) -> Router {
    router
        // Member endpoints
        .route("/members", get(list_members_handler))
        .route("/members/asDto", get(list_member_summaries_handler))
        .route("/members/{id}", get(get_member_username_handler))
        // Team endpoints
        .route("/teams/{id}/members", get(list_team_members_handler))
        // Add service and paging config as extensions for handlers
        .layer(Extension(service))
        .layer(Extension(config))
}

// ===== Handler wrappers that extract service from Extension =====

async fn get_member_username_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<u64>,
) -> Result<String, Problem> {
    handlers::get_member_username(service, path).await
}

async fn list_members_handler(
    Extension(service): Extension<Arc<Service>>,
    Extension(config): Extension<Arc<Config>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<PageDto<MemberDto>>, Problem> {
    handlers::list_members(service, config, raw).await
}

async fn list_member_summaries_handler(
    Extension(service): Extension<Arc<Service>>,
    Extension(config): Extension<Arc<Config>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<PageDto<MemberSummaryDto>>, Problem> {
    handlers::list_member_summaries(service, config, raw).await
}

async fn list_team_members_handler(
    Extension(service): Extension<Arc<Service>>,
    path: Path<u64>,
) -> Result<Json<Vec<MemberDto>>, Problem> {
    handlers::list_team_members(service, path).await
}
