pub mod api;
pub mod config;
pub mod error;
pub mod idgen;
pub mod lifecycle;
pub mod models;
pub mod notify;
pub mod observability;
pub mod scraper;
pub mod state;
pub mod store;
