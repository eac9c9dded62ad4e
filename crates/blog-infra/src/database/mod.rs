//! Database connection management and SeaORM repositories.

mod connections;

#[cfg(feature = "database")]
mod base;
#[cfg(feature = "database")]
pub mod entity;
#[cfg(feature = "database")]
mod repositories;
#[cfg(feature = "database")]
pub mod schema;

pub use connections::DatabaseConfig;

#[cfg(feature = "database")]
pub use base::SeaOrmBaseRepository;
#[cfg(feature = "database")]
pub use connections::{connect, connect_options};
#[cfg(feature = "database")]
pub use repositories::{SeaOrmPostRepository, SeaOrmUserRepository};
