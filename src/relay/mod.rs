//! Request relay subsystem.
//!
//! # Data Flow
//! ```text
//! RelayPayload (client JSON)
//!     → types.rs (required fields, header normalisation)
//!     → client.rs (method/URL/header checks, reqwest call)
//!     → RelayResponse { status, headers, data }   any status code
//!     → RelayError::Unreachable                  no response at all
//!     → RelayError::Invalid                      nothing was sent
//! ```
//!
//! # Design Decisions
//! - Non-2xx answers are results, not errors
//! - Response bodies are parsed as JSON when possible, otherwise kept as text
//! - No retries; the user asked for exactly one call

pub mod client;
pub mod types;

pub use client::{RelayClient, RelayError};
pub use types::{HeaderInput, RelayInputError, RelayPayload, RelayRequest, RelayResponse};
