//! # Blog Server
//!
//! Server-rendered blog on Actix-web: the route table, handlers, views and
//! the state they share.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod router;
pub mod state;
pub mod telemetry;
pub mod views;

pub use config::AppConfig;
pub use handlers::configure_routes;
pub use state::AppState;
