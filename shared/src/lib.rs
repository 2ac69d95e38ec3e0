//! Shared types for the catalog admin
//!
//! Wire models, the response envelope and money helpers used by both
//! `catalog-client` and `catalog-admin`.

pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};

pub use models::{
    Category, EntityRef, Product, ProductUpdate, Subcategory,
    DEFAULT_SHIPPING_CHARGE,
};
pub use response::{Envelope, EnvelopeError};
