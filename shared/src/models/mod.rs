//! Data models
//!
//! Wire shapes of the catalog REST API. Identifiers are the server's
//! opaque `_id` strings.

pub mod category;
pub mod product;

// Re-exports
pub use category::*;
pub use product::*;
