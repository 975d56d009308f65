//! Test utilities for mcp-dash
//!
//! Provides mock record constructors and helper functions for testing
//! across crates.
//!
//! # Example
//!
//! ```
//! use common::test_utils::mock_server_info;
//!
//! let server = mock_server_info("fetch");
//! assert_eq!(server.name, "fetch");
//! assert_eq!(server.state, "running");
//! ```

use api::{RegistryServer, ServerInfo};
use std::time::Duration;

/// Default test timeout (5 seconds)
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a mock ServerInfo for testing
///
/// The record looks like a running SSE server with a published port, which
/// is the common case on the dashboard.
pub fn mock_server_info(name: &str) -> ServerInfo {
    ServerInfo {
        id: format!("container-{}", name),
        name: name.to_string(),
        image: format!("ghcr.io/example/{}:latest", name),
        state: "running".to_string(),
        transport: "sse".to_string(),
        tool_type: Some("mcp".to_string()),
        port: 21000,
        url: format!("http://localhost:21000/sse#{}", name),
    }
}

/// Create a mock ServerInfo with every optional field absent
///
/// Exercises the card fallback rendering ("unknown", "N/A").
pub fn mock_sparse_server_info(name: &str) -> ServerInfo {
    ServerInfo {
        id: String::new(),
        name: name.to_string(),
        image: String::new(),
        state: String::new(),
        transport: String::new(),
        tool_type: None,
        port: 0,
        url: String::new(),
    }
}

/// Create a mock RegistryServer for testing
pub fn mock_registry_server(name: &str) -> RegistryServer {
    RegistryServer {
        name: name.to_string(),
        image: format!("ghcr.io/example/{}:latest", name),
        description: format!("A {} MCP server", name),
        transport: "stdio".to_string(),
        tags: vec!["test".to_string(), name.to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_server_info() {
        let server = mock_server_info("fetch");
        assert_eq!(server.name, "fetch");
        assert!(server.url.contains("fetch"));
        assert_eq!(server.port, 21000);
    }

    #[test]
    fn test_mock_sparse_server_info() {
        let server = mock_sparse_server_info("bare");
        assert_eq!(server.port, 0);
        assert!(server.transport.is_empty());
        assert!(server.tool_type.is_none());
    }

    #[test]
    fn test_mock_registry_server() {
        let entry = mock_registry_server("github");
        assert_eq!(entry.tags.len(), 2);
        assert!(entry.description.contains("github"));
    }
}
