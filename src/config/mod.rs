//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FormRelayConfig (validated, immutable)
//!     → cloned into each worker process at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; both workers read the same file
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{FormRelayConfig, HttpConfig, ObservabilityConfig, RelayConfig, StoreConfig};
