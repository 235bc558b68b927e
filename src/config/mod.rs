//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → app.rs builds the type, route and source registries
//! ```
//!
//! # Design Decisions
//! - Config is read once per process; a Tab press is a fresh process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AppConfig, RouteConfig, SourceConfig, TypeConfig, TypeKind};
pub use validation::{validate_config, ValidationError};
