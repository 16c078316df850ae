pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod docs;
pub mod engine;
pub mod model;
pub mod models;
pub mod routes;
pub mod store;
