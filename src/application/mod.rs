pub mod auth_service;
pub mod dto;
pub mod password;
pub mod sale_service;
pub mod token;
pub mod user_service;
pub mod vehicle_service;
