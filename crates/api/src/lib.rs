//! API types for mcp-dash
//!
//! This crate defines the wire format spoken by the dashboard backend: the
//! uniform `{success, data, error}` response envelope, the server and
//! registry records it carries, and the request bodies the client submits.
//!
//! # Example
//!
//! ```
//! use api::{Envelope, ServerInfo};
//!
//! let body = r#"{"success": true, "data": [{"id": "c1", "name": "fetch",
//!     "image": "ghcr.io/example/fetch:latest", "state": "running",
//!     "transport": "sse", "port": 21000,
//!     "url": "http://localhost:21000/sse#fetch"}]}"#;
//!
//! let envelope: Envelope<Vec<ServerInfo>> = serde_json::from_str(body).unwrap();
//! assert!(envelope.success);
//! assert_eq!(envelope.data.unwrap()[0].name, "fetch");
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use error::{ApiError, Result};
pub use types::{CustomCommandRequest, Envelope, RegistryServer, RunServerRequest, ServerInfo};
