//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Supervisor (supervisor.rs, `form-relay all`):
//!     spawn `form-relay http` + `form-relay relay` → wait → stop both
//!
//! Worker (startup.rs, `form-relay http|relay`):
//!     Load config → Init logging → Bind socket → Serve → Release socket
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Workers are OS processes; the datagram socket is their only link
//! - Shutdown is abrupt for the supervisor (children are killed) and
//!   prompt for workers (stop accepting, release socket, exit)

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::Shutdown;
pub use startup::{run_worker, Role, WorkerError};
pub use supervisor::{Supervisor, SupervisorError};
