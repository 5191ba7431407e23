//! Client for the API tester backend.

mod client;

pub use client::{ApiResponse, ApiTesterClient, RelayCall, SavedRequestSpec, CollectionSpec};
