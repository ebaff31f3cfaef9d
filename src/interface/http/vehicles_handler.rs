use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    application::dto::{
        CreateVehicleRequest, ListVehiclesQueryRequest, PaginatedResponse, UpdateVehicleRequest,
        VehicleResponse, parse_id,
    },
    domain::user::Role,
    interface::http::{
        auth::AuthUser,
        extract::{ApiJson, ApiQuery},
        problem::ApiResult,
    },
    state::AppState,
};

pub async fn list_vehicles(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListVehiclesQueryRequest>,
) -> ApiResult<Json<PaginatedResponse<VehicleResponse>>> {
    Ok(Json(state.vehicle_service.list_vehicles(query).await?))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<VehicleResponse>> {
    let id = parse_id(&id, "id")?;
    Ok(Json(state.vehicle_service.get_vehicle(id).await?))
}

pub async fn create_vehicle(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreateVehicleRequest>,
) -> ApiResult<(StatusCode, Json<VehicleResponse>)> {
    auth.require_any(&Role::STAFF)?;
    let created = state.vehicle_service.create_vehicle(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Serves both PUT and PATCH; absent fields keep their stored values.
pub async fn update_vehicle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateVehicleRequest>,
) -> ApiResult<Json<VehicleResponse>> {
    auth.require_any(&Role::STAFF)?;
    let id = parse_id(&id, "id")?;
    Ok(Json(state.vehicle_service.update_vehicle(id, request).await?))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    auth.require_any(&Role::STAFF)?;
    let id = parse_id(&id, "id")?;
    state.vehicle_service.delete_vehicle(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
