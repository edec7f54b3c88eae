//! # Staybook
//!
//! Backend for a short-stay booking marketplace: hosts publish listings,
//! guests book them, and completed stays can be reviewed.
//!
//! ## Architecture
//!
//! - **domain**: entities, business rules and repository traits
//! - **application**: use-case services and read models
//! - **infrastructure**: SeaORM persistence, in-memory storage, password hashing
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: errors, money, pagination, clock and shutdown helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig, InMemoryStorage, SeaOrmRepositoryProvider};

pub use interfaces::http::{create_api_router, ApiContext};
