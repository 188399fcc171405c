//! Datagram relay subsystem.
//!
//! # Data Flow
//! ```text
//! UDP datagram (raw form body)
//!     → listener.rs (recv, log sender + payload)
//!     → codec::form::decode
//!     → message::normalize
//!     → store::PersistenceSink::persist
//!     → log outcome, wait for next datagram
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: one datagram fully processed before the next recv
//! - Decode and store failures drop the message; only socket failures stop
//!   the listener
//! - No acknowledgement is ever sent back to the front-end

pub mod listener;

pub use listener::{ProcessError, RelayError, RelayListener};
