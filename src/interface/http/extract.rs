use axum::extract::{FromRequest, FromRequestParts};

use crate::interface::http::problem::ApiProblem;

/// `Json` whose rejections render as problem documents.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiProblem))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejections render as problem documents.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiProblem))]
pub struct ApiQuery<T>(pub T);
