pub mod auth;
pub mod auth_handler;
pub mod extract;
pub mod problem;
pub mod sales_handler;
pub mod users_handler;
pub mod vehicles_handler;
