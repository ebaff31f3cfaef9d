use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::dto::{
        default_page, default_per_page, double_option, ensure_max_len, ensure_not_blank,
        ensure_positive_amount, ensure_price_range,
    },
    domain::{
        errors::DomainError,
        listing::{PageRequest, SortOrder, normalize_search},
        vehicle::{
            NewVehicle, Vehicle, VehicleListQuery, VehiclePatch, VehicleSortBy, VehicleStatus,
        },
    },
};

#[derive(Debug, Deserialize)]
pub struct CreateVehicleRequest {
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "ano")]
    pub year: i64,
    #[serde(rename = "cor")]
    pub color: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "imagemUrl", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
}

impl CreateVehicleRequest {
    pub fn into_new_vehicle(self) -> Result<NewVehicle, DomainError> {
        validate_text(&self.brand, "marca")?;
        validate_text(&self.model, "modelo")?;
        validate_text(&self.color, "cor")?;
        let year = validate_year(self.year)?;
        ensure_positive_amount(self.price, "preco")?;
        if self.status == Some(VehicleStatus::Vendido) {
            return Err(DomainError::validation(
                "a vehicle is marked as sold only by placing a sale",
            ));
        }

        Ok(NewVehicle {
            brand: self.brand.trim().to_string(),
            model: self.model.trim().to_string(),
            year,
            color: self.color.trim().to_string(),
            price: self.price,
            image_url: normalize_image_url(self.image_url),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVehicleRequest {
    #[serde(rename = "marca", default)]
    pub brand: Option<String>,
    #[serde(rename = "modelo", default)]
    pub model: Option<String>,
    #[serde(rename = "ano", default)]
    pub year: Option<i64>,
    #[serde(rename = "cor", default)]
    pub color: Option<String>,
    #[serde(rename = "preco", default)]
    pub price: Option<f64>,
    #[serde(rename = "imagemUrl", default, deserialize_with = "double_option")]
    pub image_url: Option<Option<String>>,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
}

impl UpdateVehicleRequest {
    pub fn into_patch(self) -> Result<VehiclePatch, DomainError> {
        let patch = VehiclePatch {
            brand: self.brand.map(|brand| trimmed(brand, "marca")).transpose()?,
            model: self.model.map(|model| trimmed(model, "modelo")).transpose()?,
            year: self.year.map(validate_year).transpose()?,
            color: self.color.map(|color| trimmed(color, "cor")).transpose()?,
            price: self
                .price
                .map(|price| ensure_positive_amount(price, "preco").map(|()| price))
                .transpose()?,
            image_url: self.image_url.map(normalize_image_url),
            status: self.status,
        };

        if patch.is_empty() {
            return Err(DomainError::validation(
                "at least one field must be provided for update",
            ));
        }

        Ok(patch)
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "ano")]
    pub year: u16,
    #[serde(rename = "cor")]
    pub color: String,
    #[serde(rename = "preco")]
    pub price: f64,
    #[serde(rename = "imagemUrl")]
    pub image_url: Option<String>,
    pub status: VehicleStatus,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleResponse {
    fn from(value: Vehicle) -> Self {
        Self {
            id: value.id,
            brand: value.brand,
            model: value.model,
            year: value.year,
            color: value.color,
            price: value.price,
            image_url: value.image_url,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListVehiclesQueryRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub sort_by: VehicleSortBy,
    #[serde(default)]
    pub order: SortOrder,
}

impl ListVehiclesQueryRequest {
    pub fn into_domain(self) -> Result<VehicleListQuery, DomainError> {
        ensure_price_range(self.min_price, self.max_price)?;

        Ok(VehicleListQuery {
            page: PageRequest::new(self.page, self.per_page)?,
            search: normalize_search(self.search),
            status: self.status,
            min_price: self.min_price,
            max_price: self.max_price,
            sort_by: self.sort_by,
            order: self.order,
        })
    }
}

fn validate_text(value: &str, field: &str) -> Result<(), DomainError> {
    ensure_not_blank(value, field)?;
    ensure_max_len(value, field, 80)
}

fn trimmed(value: String, field: &str) -> Result<String, DomainError> {
    validate_text(&value, field)?;
    Ok(value.trim().to_string())
}

fn validate_year(year: i64) -> Result<u16, DomainError> {
    u16::try_from(year)
        .ok()
        .filter(|year| *year > 0)
        .ok_or_else(|| DomainError::validation("ano must be a positive year"))
}

fn normalize_image_url(image_url: Option<String>) -> Option<String> {
    image_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_request_reads_portuguese_field_names() {
        let request: CreateVehicleRequest = serde_json::from_value(json!({
            "marca": " Toyota ",
            "modelo": "Corolla",
            "ano": 2021,
            "cor": "preto",
            "preco": 98000.5,
            "imagemUrl": ""
        }))
        .unwrap();

        let vehicle = request.into_new_vehicle().unwrap();
        assert_eq!(vehicle.brand, "Toyota");
        assert_eq!(vehicle.year, 2021);
        assert_eq!(vehicle.image_url, None);
    }

    #[test]
    fn create_request_refuses_sold_status_and_bad_numbers() {
        let sold: CreateVehicleRequest = serde_json::from_value(json!({
            "marca": "Fiat", "modelo": "Uno", "ano": 2010, "cor": "branco",
            "preco": 20000, "status": "vendido"
        }))
        .unwrap();
        assert!(sold.into_new_vehicle().is_err());

        let negative: CreateVehicleRequest = serde_json::from_value(json!({
            "marca": "Fiat", "modelo": "Uno", "ano": -1, "cor": "branco", "preco": 20000
        }))
        .unwrap();
        assert!(negative.into_new_vehicle().is_err());
    }

    #[test]
    fn update_distinguishes_null_image_from_absent() {
        let cleared: UpdateVehicleRequest =
            serde_json::from_value(json!({ "imagemUrl": null })).unwrap();
        assert_eq!(cleared.into_patch().unwrap().image_url, Some(None));

        let untouched: UpdateVehicleRequest =
            serde_json::from_value(json!({ "cor": "azul" })).unwrap();
        assert_eq!(untouched.into_patch().unwrap().image_url, None);
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(UpdateVehicleRequest::default().into_patch().is_err());
    }
}
