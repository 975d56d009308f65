//! Wire type definitions
//!
//! All backend endpoints wrap their payload in the same `{success, data,
//! error}` envelope. The records below mirror the backend JSON field for
//! field; every field the backend may omit carries a serde default so a
//! partial record still decodes.

use serde::{Deserialize, Serialize};

/// Uniform response envelope used by every backend endpoint
///
/// `data` is absent on errors and may be `null` even on success (for
/// example an empty server list). Callers substitute the payload type's
/// default in that case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Application-level success flag, independent of the HTTP status
    pub success: bool,
    /// Payload, present only when the operation produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Server-supplied error message, present only on failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Build a success envelope carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Build a failure envelope carrying an error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// A managed server process as reported by `GET /api/servers`
///
/// All fields come from the backend; the client never mutates a record,
/// it re-fetches the whole list on every refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Container identifier
    #[serde(default)]
    pub id: String,
    /// Server name
    #[serde(default)]
    pub name: String,
    /// Container image reference
    #[serde(default)]
    pub image: String,
    /// Lifecycle state (e.g. "running", "exited")
    #[serde(default)]
    pub state: String,
    /// Transport kind (e.g. "sse", "stdio")
    #[serde(default)]
    pub transport: String,
    /// Tool type label, when the backend knows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_type: Option<String>,
    /// Published port, 0 when none is exposed
    #[serde(default)]
    pub port: u16,
    /// Reachable URL, empty when no port is exposed
    #[serde(default)]
    pub url: String,
}

/// A registry catalog entry as reported by `GET /api/registry/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryServer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub transport: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Body of `POST /api/servers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunServerRequest {
    pub name: String,
}

/// Body of `POST /api/command`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomCommandRequest {
    pub command: String,
}
