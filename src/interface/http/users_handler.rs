use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    application::dto::{
        CreateUserRequest, ListUsersQueryRequest, PaginatedResponse, UpdateUserRequest,
        UserResponse, parse_id,
    },
    domain::user::{Role, UserScope},
    interface::http::{
        auth::AuthUser,
        extract::{ApiJson, ApiQuery},
        problem::ApiResult,
    },
    state::AppState,
};

const CLIENTS: UserScope = UserScope::Clients;
const STAFF: UserScope = UserScope::Staff;

pub async fn create_client(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    auth.require_any(&Role::STAFF)?;
    let created = state.user_service.create_user(CLIENTS, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_clients(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListUsersQueryRequest>,
) -> ApiResult<Json<PaginatedResponse<UserResponse>>> {
    auth.require_any(&Role::STAFF)?;
    Ok(Json(state.user_service.list_users(CLIENTS, query).await?))
}

pub async fn get_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    auth.require_any(&Role::STAFF)?;
    let id = parse_id(&id, "id")?;
    Ok(Json(state.user_service.get_user(CLIENTS, id).await?))
}

pub async fn get_client_by_cpf(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(cpf): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    auth.require_any(&Role::STAFF)?;
    Ok(Json(state.user_service.get_user_by_cpf(CLIENTS, &cpf).await?))
}

pub async fn update_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    auth.require_any(&Role::STAFF)?;
    let id = parse_id(&id, "id")?;
    Ok(Json(state.user_service.update_user(CLIENTS, id, request).await?))
}

pub async fn delete_client(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth.require_any(&Role::MANAGERS)?;
    let id = parse_id(&id, "id")?;
    state.user_service.delete_user(CLIENTS, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    auth.require_any(&Role::MANAGERS)?;
    let created = state.user_service.create_user(STAFF, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_employees(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListUsersQueryRequest>,
) -> ApiResult<Json<PaginatedResponse<UserResponse>>> {
    auth.require_any(&Role::MANAGERS)?;
    Ok(Json(state.user_service.list_users(STAFF, query).await?))
}

pub async fn get_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    auth.require_any(&Role::MANAGERS)?;
    let id = parse_id(&id, "id")?;
    Ok(Json(state.user_service.get_user(STAFF, id).await?))
}

pub async fn get_employee_by_cpf(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(cpf): Path<String>,
) -> ApiResult<Json<UserResponse>> {
    auth.require_any(&Role::MANAGERS)?;
    Ok(Json(state.user_service.get_user_by_cpf(STAFF, &cpf).await?))
}

pub async fn update_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    auth.require_any(&Role::MANAGERS)?;
    let id = parse_id(&id, "id")?;
    Ok(Json(state.user_service.update_user(STAFF, id, request).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth.require_any(&Role::MANAGERS)?;
    let id = parse_id(&id, "id")?;
    state.user_service.delete_user(STAFF, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
