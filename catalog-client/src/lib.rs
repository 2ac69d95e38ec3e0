//! Catalog Client - HTTP client for the catalog REST API
//!
//! Provides the `CatalogApi` operations (products, categories,
//! subcategories) over a pluggable `HttpClient` transport.

pub mod catalog;
pub mod config;
pub mod error;
pub mod http;

pub use catalog::{CatalogApi, RemoteCatalog};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};

// Re-export shared types for convenience
pub use shared::{
    Category, EntityRef, Envelope, Product, ProductUpdate, Subcategory,
};
