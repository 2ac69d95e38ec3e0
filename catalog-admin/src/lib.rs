//! Catalog Admin - product list controller and operator console
//!
//! The [`controller::ListController`] keeps the fetched catalog, the
//! filter/sort inputs and the edit draft consistent. Its collaborators
//! (the remote [`CatalogApi`](catalog_client::CatalogApi), a
//! [`ConfirmPrompt`](prompt::ConfirmPrompt) and a
//! [`Notifier`](notify::Notifier)) are injected.

pub mod cli;
pub mod config;
pub mod controller;
pub mod draft;
pub mod error;
pub mod logging;
pub mod notify;
pub mod prompt;
pub mod view;

pub use config::AdminConfig;
pub use controller::{DeleteOutcome, ListController, ListView, PhaseKind, ReloadReport};
pub use draft::{DraftError, DraftField, EditDraft};
pub use error::{ControllerError, ControllerResult};
pub use notify::{Notice, NoticeLevel, Notifier};
pub use prompt::ConfirmPrompt;
pub use view::{CategoryFilter, FilterState, ProductCard, SortKey};

// Re-export for binaries and tests
pub use catalog_client;
pub use shared;
