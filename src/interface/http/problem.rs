use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::domain::errors::DomainError;

pub type ApiResult<T> = Result<T, ApiProblem>;

const PROBLEM_BASE: &str = "https://dealership.local/problems";

#[derive(Debug)]
pub struct ApiProblem {
    status: StatusCode,
    title: &'static str,
    slug: &'static str,
    detail: String,
    correlation_id: String,
}

impl ApiProblem {
    pub fn from_domain(error: DomainError) -> Self {
        match error {
            DomainError::Validation(detail) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation failed", "validation", detail)
            }
            DomainError::Unauthorized(detail) => {
                Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", "unauthorized", detail)
            }
            DomainError::Forbidden(detail) => {
                Self::new(StatusCode::FORBIDDEN, "Forbidden", "forbidden", detail)
            }
            DomainError::NotFound(detail) => {
                Self::new(StatusCode::NOT_FOUND, "Not found", "not-found", detail)
            }
            DomainError::Conflict(detail) => {
                Self::new(StatusCode::CONFLICT, "Conflict", "conflict", detail)
            }
            DomainError::Storage(detail) => Self::server_error("Storage error", "storage", detail),
            DomainError::Internal(detail) => {
                Self::server_error("Internal server error", "internal", detail)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Server-side failures are logged in full and reported without detail.
    fn server_error(title: &'static str, slug: &'static str, detail: String) -> Self {
        let problem = Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            title,
            slug,
            "the server could not complete the request",
        );
        error!(correlation_id = %problem.correlation_id, %detail, "{title}");
        problem
    }

    fn new(
        status: StatusCode,
        title: &'static str,
        slug: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            status,
            title,
            slug,
            detail: detail.into(),
            correlation_id: Uuid::new_v4().to_string(),
        }
    }
}

impl From<DomainError> for ApiProblem {
    fn from(value: DomainError) -> Self {
        Self::from_domain(value)
    }
}

impl From<JsonRejection> for ApiProblem {
    fn from(value: JsonRejection) -> Self {
        Self::from_domain(DomainError::validation(value.body_text()))
    }
}

impl From<QueryRejection> for ApiProblem {
    fn from(value: QueryRejection) -> Self {
        Self::from_domain(DomainError::validation(value.body_text()))
    }
}

#[derive(Debug, Serialize)]
struct ProblemDetails {
    #[serde(rename = "type")]
    kind: String,
    title: &'static str,
    status: u16,
    detail: String,
    correlation_id: String,
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        let payload = ProblemDetails {
            kind: format!("{PROBLEM_BASE}/{}", self.slug),
            title: self.title,
            status: self.status.as_u16(),
            detail: self.detail,
            correlation_id: self.correlation_id,
        };

        let mut response = (self.status, Json(payload)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}
