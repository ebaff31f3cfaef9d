use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    listing::{PageRequest, SortOrder},
    user::{Cpf, User},
    vehicle::Vehicle,
};

pub const DEFAULT_COMMISSION_RATE: f64 = 0.05;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub client_id: Uuid,
    pub employee_id: Uuid,
    pub final_price: f64,
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    /// Short code shown to people: the last six hex digits of the id.
    pub fn reference(&self) -> String {
        let simple = self.id.simple().to_string();
        simple[simple.len() - 6..].to_uppercase()
    }

    pub fn involves(&self, id: Uuid) -> bool {
        self.vehicle_id == id || self.client_id == id || self.employee_id == id
    }
}

/// A sale about to be recorded. Parties are named by CPF and resolved by the store.
#[derive(Debug, Clone)]
pub struct NewSale {
    pub vehicle_id: Uuid,
    pub client_cpf: Cpf,
    pub employee_cpf: Cpf,
    pub final_price: f64,
}

#[derive(Debug, Clone)]
pub struct VehicleSummary {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub color: String,
}

impl From<&Vehicle> for VehicleSummary {
    fn from(value: &Vehicle) -> Self {
        Self {
            id: value.id,
            brand: value.brand.clone(),
            model: value.model.clone(),
            year: value.year,
            color: value.color.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PartySummary {
    pub id: Uuid,
    pub name: String,
    pub cpf: Cpf,
}

impl From<&User> for PartySummary {
    fn from(value: &User) -> Self {
        Self {
            id: value.id,
            name: value.name.clone(),
            cpf: value.cpf.clone(),
        }
    }
}

/// A sale joined with the documents it references.
#[derive(Debug, Clone)]
pub struct SaleDetails {
    pub sale: Sale,
    pub vehicle: VehicleSummary,
    pub client: PartySummary,
    pub employee: PartySummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleSortBy {
    #[default]
    SaleDate,
    FinalPrice,
}

#[derive(Debug, Clone)]
pub struct SaleListQuery {
    pub page: PageRequest,
    pub search: Option<String>,
    pub employee_cpf: Option<Cpf>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort_by: SaleSortBy,
    pub order: SortOrder,
}

impl Default for SaleListQuery {
    fn default() -> Self {
        Self {
            page: PageRequest::default(),
            search: None,
            employee_cpf: None,
            from: None,
            to: None,
            min_price: None,
            max_price: None,
            sort_by: SaleSortBy::SaleDate,
            order: SortOrder::Desc,
        }
    }
}

/// Commission owed on a sale, rounded to cents.
pub fn commission(final_price: f64, rate: f64) -> f64 {
    (final_price * rate * 100.0).round() / 100.0
}
