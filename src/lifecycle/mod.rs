//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → Store (schema) → Relay + Annotator clients → Bind listener
//!
//! Run:
//!     RetentionSweeper task + HTTP server, both subscribed to Shutdown
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → server drains → store closes
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, so traffic only arrives once the store is ready

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Application, StartupError};
