//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::MemberError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 400 for malformed request parameters
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request").with_detail(detail)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/problem+json")],
            Json(self),
        )
            .into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: MemberError) -> Problem {
    match error {
        MemberError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{resource} Not Found"))
                .with_detail(format!("{resource} with id '{id}' was not found"))
        }

        MemberError::ConstraintViolation { reason } => {
            Problem::new(StatusCode::BAD_REQUEST, "Constraint Violation").with_detail(reason)
        }

        MemberError::Unavailable { reason } => {
            tracing::error!(%reason, "backing store unavailable");
            Problem::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable")
                .with_detail("The backing store could not be reached")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(map_domain_error(MemberError::not_found("member", 7)).status, 404);
        assert_eq!(map_domain_error(MemberError::constraint("bad")).status, 400);
        let unavailable = MemberError::Unavailable {
            reason: "connection refused".to_string(),
        };
        let problem = map_domain_error(unavailable);
        assert_eq!(problem.status, 503);
        assert!(!problem.detail.unwrap_or_default().contains("refused"));
    }

    #[test]
    fn test_not_found_detail() {
        let problem = map_domain_error(MemberError::not_found("member", 7));
        assert_eq!(problem.title, "member Not Found");
        assert_eq!(
            problem.detail.as_deref(),
            Some("member with id '7' was not found")
        );
    }
}
