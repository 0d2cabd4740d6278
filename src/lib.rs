//! # Samsara Connector
//!
//! A Rust connector for the Samsara fleet-management REST API: vehicles,
//! drivers, routes, assets, tags, addresses, documents, sensors, safety,
//! compliance, and webhooks, exposed as typed operations plus an inbound
//! webhook trigger.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use samsara_connector::dispatch::{run_items, OperationRequest};
//! use samsara_connector::transport::{ApiClient, ApiClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> samsara_connector::Result<()> {
//!     let client = ApiClient::new(ApiClientConfig::new("my-api-token"));
//!
//!     let request: OperationRequest = serde_json::from_value(serde_json::json!({
//!         "resource": "vehicle",
//!         "operation": "getAll",
//!         "returnAll": true,
//!     }))?;
//!
//!     for item in run_items(&client, vec![request], false).await? {
//!         println!("{}", item.json);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Dispatcher                           │
//! │     (resource, operation, params) → typed handler call      │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                             │
//! ┌───────────────┴──────────────┐  ┌───────────┴──────────────┐
//! │     Resource handlers (11)   │  │   Webhook trigger        │
//! │  query/body assembly → HTTP  │  │  check / create / delete │
//! └───────────────┬──────────────┘  └───────────┬──────────────┘
//!                 │                             │
//! ┌───────────────┴─────────────────────────────┴──────────────┐
//! │   Pagination (cursor-following fetch_all)  +  Transport    │
//! │        (bearer auth, envelope resolution, no retries)      │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: full API docs before publishing

/// Error types for the connector
pub mod error;

/// Common types and type aliases
pub mod types;

/// Credentials and connector configuration
pub mod config;

/// Query-string and time-range normalization
pub mod query;

/// Payload shaping helpers (geofences, route stops)
pub mod format;

/// Typed option catalogs (stat types, event types, sensor series)
pub mod options;

/// Single-request HTTP transport
pub mod transport;

/// Cursor-following pagination
pub mod pagination;

/// Per-resource operation handlers
pub mod resources;

/// Operation routing and item packing
pub mod dispatch;

/// Webhook subscription lifecycle and delivery handling
pub mod webhook;

/// Command-line interface
pub mod cli;

pub use error::{Error, Result};
pub use types::*;

use once_cell::sync::OnceCell;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

static STARTUP_NOTICE: OnceCell<()> = OnceCell::new();

/// Log the startup notice once per process.
///
/// Initialized unset; set on first call and never cleared for the lifetime
/// of the process, so repeated dispatches and trigger callbacks produce a
/// single notice.
pub fn log_startup_notice() {
    STARTUP_NOTICE.get_or_init(|| {
        tracing::info!("{NAME} {VERSION} initialized");
    });
}
