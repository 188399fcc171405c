//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! http + relay workers produce:
//!     → logging.rs (structured log events, one span per worker role)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout of each process
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;
