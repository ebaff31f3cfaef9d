use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result, bail};
use http::HeaderValue;
use tracing::warn;

use crate::{
    application::{
        password::{MAX_COST, MIN_COST},
        user_service::ManagerAccount,
    },
    domain::sale::DEFAULT_COMMISSION_RATE,
};

pub const DEV_JWT_SECRET: &str = "dealership-dev-secret-change-me";

/// Longest accepted access-token lifetime: one year.
pub const MAX_JWT_TTL_SECS: u64 = 31_536_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub jwt_ttl_secs: u64,
    pub bcrypt_cost: u32,
    pub cors_origin: HeaderValue,
    pub data_file: Option<PathBuf>,
    pub commission_rate: f64,
    pub manager: Option<ManagerAccount>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 7654)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_ttl_secs: 86_400,
            bcrypt_cost: 10,
            cors_origin: HeaderValue::from_static("http://localhost:3000"),
            data_file: None,
            commission_rate: DEFAULT_COMMISSION_RATE,
            manager: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_addr = match var("DEALERSHIP_BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse::<SocketAddr>()
                .context("DEALERSHIP_BIND_ADDR must be a valid host:port")?,
            None => defaults.bind_addr,
        };

        let jwt_secret = match var("DEALERSHIP_JWT_SECRET") {
            Some(secret) => secret,
            None => {
                warn!("DEALERSHIP_JWT_SECRET is not set, using the development secret");
                defaults.jwt_secret
            }
        };

        let jwt_ttl_secs = match var("DEALERSHIP_JWT_TTL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("DEALERSHIP_JWT_TTL_SECS must be a positive integer")?,
            None => defaults.jwt_ttl_secs,
        };
        if !(1..=MAX_JWT_TTL_SECS).contains(&jwt_ttl_secs) {
            bail!("DEALERSHIP_JWT_TTL_SECS must be between 1 and {MAX_JWT_TTL_SECS}");
        }

        let bcrypt_cost = match var("DEALERSHIP_BCRYPT_COST") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .context("DEALERSHIP_BCRYPT_COST must be an integer")?,
            None => defaults.bcrypt_cost,
        };
        if !(MIN_COST..=MAX_COST).contains(&bcrypt_cost) {
            bail!("DEALERSHIP_BCRYPT_COST must be between {MIN_COST} and {MAX_COST}");
        }

        let cors_origin = match var("DEALERSHIP_CORS_ORIGIN") {
            Some(raw) => HeaderValue::from_str(raw.trim())
                .context("DEALERSHIP_CORS_ORIGIN must be a valid header value")?,
            None => defaults.cors_origin,
        };

        let commission_rate = match var("DEALERSHIP_COMMISSION_RATE") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .context("DEALERSHIP_COMMISSION_RATE must be a number")?,
            None => defaults.commission_rate,
        };
        if !(0.0..=1.0).contains(&commission_rate) {
            bail!("DEALERSHIP_COMMISSION_RATE must be between 0 and 1");
        }

        let manager = match (
            var("DEALERSHIP_MANAGER_EMAIL"),
            var("DEALERSHIP_MANAGER_PASSWORD"),
            var("DEALERSHIP_MANAGER_CPF"),
        ) {
            (None, None, None) => None,
            (Some(email), Some(password), Some(cpf)) => Some(ManagerAccount {
                name: var("DEALERSHIP_MANAGER_NAME").unwrap_or_else(|| "Gerente".to_string()),
                email,
                password,
                cpf,
            }),
            _ => bail!(
                "DEALERSHIP_MANAGER_EMAIL, DEALERSHIP_MANAGER_PASSWORD and \
                 DEALERSHIP_MANAGER_CPF must be set together"
            ),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            jwt_ttl_secs,
            bcrypt_cost,
            cors_origin,
            data_file: var("DEALERSHIP_DATA_FILE").map(PathBuf::from),
            commission_rate,
            manager,
        })
    }
}
