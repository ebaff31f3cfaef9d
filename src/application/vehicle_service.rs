use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{
    application::dto::{
        CreateVehicleRequest, ListVehiclesQueryRequest, PaginatedResponse, UpdateVehicleRequest,
        VehicleResponse,
    },
    domain::errors::DomainError,
    infrastructure::VehicleRepository,
};

#[derive(Clone)]
pub struct VehicleService {
    repository: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    pub fn new(repository: Arc<dyn VehicleRepository>) -> Self {
        Self { repository }
    }

    pub async fn create_vehicle(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<VehicleResponse, DomainError> {
        let created = self.repository.create(request.into_new_vehicle()?).await?;
        info!(
            vehicle_id = %created.id,
            brand = %created.brand,
            model = %created.model,
            "vehicle created"
        );
        Ok(VehicleResponse::from(created))
    }

    pub async fn get_vehicle(&self, id: Uuid) -> Result<VehicleResponse, DomainError> {
        let Some(vehicle) = self.repository.get_by_id(id).await? else {
            return Err(DomainError::not_found("vehicle not found"));
        };
        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn list_vehicles(
        &self,
        query: ListVehiclesQueryRequest,
    ) -> Result<PaginatedResponse<VehicleResponse>, DomainError> {
        let paged = self.repository.list(query.into_domain()?).await?;
        Ok(PaginatedResponse::from(paged))
    }

    pub async fn update_vehicle(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> Result<VehicleResponse, DomainError> {
        let Some(updated) = self.repository.update(id, request.into_patch()?).await? else {
            return Err(DomainError::not_found("vehicle not found"));
        };
        info!(vehicle_id = %updated.id, "vehicle updated");
        Ok(VehicleResponse::from(updated))
    }

    pub async fn delete_vehicle(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.repository.delete(id).await? {
            return Err(DomainError::not_found("vehicle not found"));
        }
        info!(vehicle_id = %id, "vehicle deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{domain::vehicle::VehicleStatus, infrastructure::InMemoryStore};

    fn service() -> VehicleService {
        VehicleService::new(Arc::new(InMemoryStore::new()))
    }

    fn gol() -> CreateVehicleRequest {
        serde_json::from_value(json!({
            "marca": "Volkswagen", "modelo": "Gol", "ano": 2019, "cor": "prata", "preco": 45000
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn created_vehicle_starts_available() {
        let service = service();
        let created = service.create_vehicle(gol()).await.unwrap();

        assert_eq!(created.status, VehicleStatus::Disponivel);
        assert_eq!(service.get_vehicle(created.id).await.unwrap().model, "Gol");
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_vehicle_are_not_found() {
        let service = service();
        let patch: UpdateVehicleRequest = serde_json::from_value(json!({ "cor": "azul" })).unwrap();

        assert!(matches!(
            service.update_vehicle(Uuid::new_v4(), patch).await,
            Err(DomainError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_vehicle(Uuid::new_v4()).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_filters_by_price_window() {
        let service = service();
        service.create_vehicle(gol()).await.unwrap();
        service
            .create_vehicle(
                serde_json::from_value(json!({
                    "marca": "BMW", "modelo": "X1", "ano": 2022, "cor": "preto", "preco": 250000
                }))
                .unwrap(),
            )
            .await
            .unwrap();

        let query: ListVehiclesQueryRequest =
            serde_json::from_value(json!({ "max_price": 100000.0 })).unwrap();
        let page = service.list_vehicles(query).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].brand, "Volkswagen");
    }
}
