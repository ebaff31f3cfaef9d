use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    application::dto::{
        default_page, default_per_page, ensure_positive_amount, ensure_price_range, parse_id,
    },
    domain::{
        errors::DomainError,
        listing::{PageRequest, SortOrder, normalize_search},
        sale::{
            NewSale, PartySummary, SaleDetails, SaleListQuery, SaleSortBy, VehicleSummary,
            commission,
        },
        user::Cpf,
    },
};

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    #[serde(rename = "vehicleId")]
    pub vehicle_id: String,
    #[serde(rename = "clienteCpf")]
    pub client_cpf: String,
    #[serde(rename = "funcionarioCpf")]
    pub employee_cpf: String,
    #[serde(rename = "finalPrice")]
    pub final_price: f64,
}

impl CreateSaleRequest {
    pub fn into_new_sale(self) -> Result<NewSale, DomainError> {
        ensure_positive_amount(self.final_price, "finalPrice")?;

        Ok(NewSale {
            vehicle_id: parse_id(&self.vehicle_id, "vehicleId")?,
            client_cpf: Cpf::parse(&self.client_cpf)?,
            employee_cpf: Cpf::parse(&self.employee_cpf)?,
            final_price: self.final_price,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SaleVehicleResponse {
    pub id: Uuid,
    pub marca: String,
    pub modelo: String,
    pub ano: u16,
    pub cor: String,
}

impl From<VehicleSummary> for SaleVehicleResponse {
    fn from(value: VehicleSummary) -> Self {
        Self {
            id: value.id,
            marca: value.brand,
            modelo: value.model,
            ano: value.year,
            cor: value.color,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SalePartyResponse {
    pub id: Uuid,
    pub name: String,
    pub cpf: String,
}

impl From<PartySummary> for SalePartyResponse {
    fn from(value: PartySummary) -> Self {
        Self {
            id: value.id,
            name: value.name,
            cpf: value.cpf.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: Uuid,
    pub reference: String,
    pub vehicle: SaleVehicleResponse,
    pub cliente: SalePartyResponse,
    pub funcionario: SalePartyResponse,
    pub final_price: f64,
    pub commission: f64,
    pub sale_date: DateTime<Utc>,
}

impl SaleResponse {
    pub fn from_details(details: SaleDetails, commission_rate: f64) -> Self {
        Self {
            id: details.sale.id,
            reference: details.sale.reference(),
            vehicle: details.vehicle.into(),
            cliente: details.client.into(),
            funcionario: details.employee.into(),
            final_price: details.sale.final_price,
            commission: commission(details.sale.final_price, commission_rate),
            sale_date: details.sale.sale_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListSalesQueryRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub funcionario_cpf: Option<String>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub sort_by: SaleSortBy,
    #[serde(default = "newest_first")]
    pub order: SortOrder,
}

impl ListSalesQueryRequest {
    pub fn into_domain(self) -> Result<SaleListQuery, DomainError> {
        ensure_price_range(self.min_price, self.max_price)?;
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err(DomainError::validation("from must not be after to"));
        }

        Ok(SaleListQuery {
            page: PageRequest::new(self.page, self.per_page)?,
            search: normalize_search(self.search),
            employee_cpf: self
                .funcionario_cpf
                .as_deref()
                .map(Cpf::parse)
                .transpose()?,
            from: self.from,
            to: self.to,
            min_price: self.min_price,
            max_price: self.max_price,
            sort_by: self.sort_by,
            order: self.order,
        })
    }
}

const fn newest_first() -> SortOrder {
    SortOrder::Desc
}
