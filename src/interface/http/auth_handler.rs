use axum::{Json, extract::State};

use crate::{
    application::dto::{HealthResponse, LoginRequest, LoginResponse, ProfileResponse},
    interface::http::{auth::AuthUser, extract::ApiJson, problem::ApiResult},
    state::AppState,
};

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = state.auth_service.login(request).await?;
    Ok(Json(response))
}

pub async fn me(AuthUser(current): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(current))
}
