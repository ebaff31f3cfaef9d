use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    errors::DomainError,
    listing::Page,
    sale::{NewSale, Sale, SaleDetails, SaleListQuery},
    user::{Cpf, NewUser, User, UserListQuery, UserPatch},
    vehicle::{NewVehicle, Vehicle, VehicleListQuery, VehiclePatch},
};

pub mod in_memory_store;
pub mod snapshot;

pub use in_memory_store::InMemoryStore;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_cpf(&self, cpf: &Cpf) -> Result<Option<User>, DomainError>;
    async fn list(&self, query: UserListQuery) -> Result<Page<User>, DomainError>;
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, DomainError>;
    /// Fails with a conflict when a recorded sale references the user.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn create(&self, vehicle: NewVehicle) -> Result<Vehicle, DomainError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, DomainError>;
    async fn list(&self, query: VehicleListQuery) -> Result<Page<Vehicle>, DomainError>;
    async fn update(&self, id: Uuid, patch: VehiclePatch)
    -> Result<Option<Vehicle>, DomainError>;
    /// Fails with a conflict when a recorded sale references the vehicle.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

#[async_trait]
pub trait SaleRepository: Send + Sync {
    /// Records the sale and marks the vehicle sold as one atomic step.
    ///
    /// The vehicle is checked first (404 when missing, 409 when sold), then
    /// the client and the staff seller are resolved by CPF.
    async fn place(&self, sale: NewSale) -> Result<Sale, DomainError>;
    async fn get_details(&self, id: Uuid) -> Result<Option<SaleDetails>, DomainError>;
    async fn list(&self, query: SaleListQuery) -> Result<Page<SaleDetails>, DomainError>;
}
