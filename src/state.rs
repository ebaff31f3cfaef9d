use std::sync::Arc;

use crate::{
    application::{
        auth_service::AuthService, password::PasswordHasher, sale_service::SaleService,
        token::TokenIssuer, user_service::UserService, vehicle_service::VehicleService,
    },
    config::AppConfig,
    domain::errors::DomainError,
    infrastructure::InMemoryStore,
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub vehicle_service: Arc<VehicleService>,
    pub sale_service: Arc<SaleService>,
}

impl AppState {
    /// Wires every service to the one store.
    pub fn new(config: &AppConfig, store: Arc<InMemoryStore>) -> Result<Self, DomainError> {
        let hasher = PasswordHasher::new(config.bcrypt_cost)?;
        let tokens = TokenIssuer::new(&config.jwt_secret, config.jwt_ttl_secs);

        Ok(Self {
            auth_service: Arc::new(AuthService::new(store.clone(), hasher, tokens)),
            user_service: Arc::new(UserService::new(store.clone(), hasher)),
            vehicle_service: Arc::new(VehicleService::new(store.clone())),
            sale_service: Arc::new(SaleService::new(store, config.commission_rate)),
        })
    }
}
