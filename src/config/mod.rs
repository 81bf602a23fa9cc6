//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, apply BASE_URL / GATEWAY_BIND_ADDRESS)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → lifecycle::startup builds the RouteTable from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the route table lives for the process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AdminConfig, AppConfig, GatewayConfig, ListenerConfig, ObservabilityConfig, RouteConfig, SecurityConfig,
    TimeoutConfig, ViewConfig,
};
pub use validation::ValidationError;
