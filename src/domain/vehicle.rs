use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::listing::{PageRequest, SortOrder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    #[default]
    Disponivel,
    Vendido,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disponivel => "disponivel",
            Self::Vendido => "vendido",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub color: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn is_available(&self) -> bool {
        self.status == VehicleStatus::Disponivel
    }
}

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub color: String,
    pub price: f64,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct VehiclePatch {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<u16>,
    pub color: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<Option<String>>,
    /// Only a restatement of the current status is accepted.
    pub status: Option<VehicleStatus>,
}

impl VehiclePatch {
    pub fn is_empty(&self) -> bool {
        self.brand.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.color.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.status.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum VehicleSortBy {
    #[default]
    #[serde(rename = "marca", alias = "brand")]
    Brand,
    #[serde(rename = "modelo", alias = "model")]
    Model,
    #[serde(rename = "ano", alias = "year")]
    Year,
    #[serde(rename = "cor", alias = "color")]
    Color,
    #[serde(rename = "preco", alias = "price")]
    Price,
    #[serde(rename = "status")]
    Status,
    #[serde(rename = "created_at")]
    CreatedAt,
}

#[derive(Debug, Clone, Default)]
pub struct VehicleListQuery {
    pub page: PageRequest,
    pub search: Option<String>,
    pub status: Option<VehicleStatus>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: VehicleSortBy,
    pub order: SortOrder,
}
