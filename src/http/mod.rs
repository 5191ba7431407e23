//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request id, trace span, CORS, body limit)
//!     → /api router
//!         → handlers/relay.rs       POST /request
//!         → handlers/history.rs     /history[/{id}]
//!         → handlers/collections.rs /collections[/{id}[/requests[/{request_id}]]]
//!         → handlers/system.rs      /health
//!     → static client files (fallback, when configured)
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use error::ApiError;
pub use server::{AppState, HttpServer};
