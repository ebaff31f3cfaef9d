use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    listing::{DEFAULT_PER_PAGE, Page},
};

pub mod auth;
pub mod sale;
pub mod user;
pub mod vehicle;

pub use auth::{LoginRequest, LoginResponse, ProfileResponse};
pub use sale::{CreateSaleRequest, ListSalesQueryRequest, SaleResponse};
pub use user::{CreateUserRequest, ListUsersQueryRequest, UpdateUserRequest, UserResponse};
pub use vehicle::{
    CreateVehicleRequest, ListVehiclesQueryRequest, UpdateVehicleRequest, VehicleResponse,
};

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<D, T: From<D>> From<Page<D>> for PaginatedResponse<T> {
    fn from(value: Page<D>) -> Self {
        let page = value.map(T::from);
        Self {
            items: page.items,
            page: page.page,
            per_page: page.per_page,
            total: page.total,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub fn parse_id(raw: &str, field: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::validation(format!("{field} must be a valid id")))
}

pub(crate) fn ensure_not_blank(value: &str, field: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    Ok(())
}

pub(crate) fn ensure_max_len(value: &str, field: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().chars().count() > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_positive_amount(value: f64, field: &str) -> Result<(), DomainError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a positive number"
        )));
    }
    Ok(())
}

pub(crate) fn ensure_price_range(
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> Result<(), DomainError> {
    if let (Some(min), Some(max)) = (min_price, max_price)
        && min > max
    {
        return Err(DomainError::validation(
            "min_price must not be greater than max_price",
        ));
    }
    Ok(())
}

/// Tells an absent field apart from an explicit `null` in PATCH bodies.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) const fn default_page() -> u32 {
    1
}

pub(crate) const fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}
