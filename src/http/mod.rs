//! HTTP front-end subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware)
//!     → GET: pages.rs (fixed documents, static files, 404 page)
//!     → POST: forward.rs (raw body → one UDP datagram to the relay)
//!             → 302 Location: / (no wait for persistence)
//! ```

pub mod forward;
pub mod pages;
pub mod server;

pub use forward::DatagramForwarder;
pub use pages::{Page, Pages};
pub use server::{AppState, FrontendError, HttpServer};
