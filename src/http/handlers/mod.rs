//! Route handlers, one module per resource.

pub mod collections;
pub mod history;
pub mod relay;
pub mod system;
