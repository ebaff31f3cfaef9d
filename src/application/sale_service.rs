use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    application::dto::{CreateSaleRequest, ListSalesQueryRequest, PaginatedResponse, SaleResponse},
    domain::errors::DomainError,
    infrastructure::SaleRepository,
};

#[derive(Clone)]
pub struct SaleService {
    sales: Arc<dyn SaleRepository>,
    commission_rate: f64,
}

impl SaleService {
    pub fn new(sales: Arc<dyn SaleRepository>, commission_rate: f64) -> Self {
        Self {
            sales,
            commission_rate,
        }
    }

    /// Records a sale between a client and a staff member, both given by CPF.
    pub async fn place_sale(
        &self,
        request: CreateSaleRequest,
    ) -> Result<SaleResponse, DomainError> {
        let sale = self.sales.place(request.into_new_sale()?).await?;

        info!(
            sale_id = %sale.id,
            vehicle_id = %sale.vehicle_id,
            employee_id = %sale.employee_id,
            final_price = sale.final_price,
            "sale recorded"
        );

        let Some(details) = self.sales.get_details(sale.id).await? else {
            return Err(DomainError::internal("recorded sale could not be read back"));
        };
        Ok(SaleResponse::from_details(details, self.commission_rate))
    }

    pub async fn get_sale(&self, id: Uuid) -> Result<SaleResponse, DomainError> {
        let Some(details) = self.sales.get_details(id).await? else {
            return Err(DomainError::not_found("sale not found"));
        };
        Ok(SaleResponse::from_details(details, self.commission_rate))
    }

    pub async fn history(
        &self,
        query: ListSalesQueryRequest,
    ) -> Result<PaginatedResponse<SaleResponse>, DomainError> {
        let rate = self.commission_rate;
        let paged = self.sales.list(query.into_domain()?).await?;
        Ok(PaginatedResponse::from(
            paged.map(|details| SaleResponse::from_details(details, rate)),
        ))
    }
}
