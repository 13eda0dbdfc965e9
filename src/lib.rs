//! Movie catalog analytics and content-based "similar movies" recommendations.

pub mod catalog;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{create_router, AppState};
