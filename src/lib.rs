//! form-relay library
//!
//! HTTP form front-end, UDP relay, and the decode → normalize → persist
//! pipeline behind them.

pub mod codec;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod message;
pub mod observability;
pub mod relay;
pub mod store;

pub use config::FormRelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::RelayListener;
