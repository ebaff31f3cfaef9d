use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    application::dto::{
        CreateSaleRequest, ListSalesQueryRequest, PaginatedResponse, SaleResponse, parse_id,
    },
    domain::user::Role,
    interface::http::{
        auth::AuthUser,
        extract::{ApiJson, ApiQuery},
        problem::ApiResult,
    },
    state::AppState,
};

pub async fn create_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreateSaleRequest>,
) -> ApiResult<(StatusCode, Json<SaleResponse>)> {
    auth.require_any(&Role::STAFF)?;
    let sale = state.sale_service.place_sale(request).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn get_sale(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleResponse>> {
    auth.require_any(&Role::STAFF)?;
    let id = parse_id(&id, "id")?;
    Ok(Json(state.sale_service.get_sale(id).await?))
}

pub async fn sales_history(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiQuery(query): ApiQuery<ListSalesQueryRequest>,
) -> ApiResult<Json<PaginatedResponse<SaleResponse>>> {
    auth.require_any(&Role::STAFF)?;
    Ok(Json(state.sale_service.history(query).await?))
}
