pub mod errors;
pub mod listing;
pub mod sale;
pub mod user;
pub mod vehicle;
