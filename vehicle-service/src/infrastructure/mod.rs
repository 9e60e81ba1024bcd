pub mod auth_client;
pub mod config;
pub mod database;
