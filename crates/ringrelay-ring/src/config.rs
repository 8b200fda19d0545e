//! Node configuration.

use ringrelay_core::NodeAddr;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on the wait for a round trip to close.
pub const DEFAULT_ROUND_TRIP_TIMEOUT_SECS: u64 = 30;

/// Configuration for a single ring node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Name this node signs with.
    pub name: String,
    /// Host other nodes reach this node at.
    pub host: String,
    /// Port other nodes reach this node at.
    pub port: u16,
    /// Entry node to register with; `None` makes this node the coordinator.
    pub entry: Option<NodeAddr>,
    /// Bound on the blocking wait inside `originate`, in seconds.
    pub round_trip_timeout_secs: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            name: "ring-node".to_string(),
            host: "127.0.0.1".to_string(),
            port: 8080,
            entry: None,
            round_trip_timeout_secs: DEFAULT_ROUND_TRIP_TIMEOUT_SECS,
        }
    }
}

impl NodeConfig {
    /// Create a coordinator configuration.
    pub fn coordinator(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create a configuration for a node joining through `entry`.
    pub fn joining(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        entry: NodeAddr,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            entry: Some(entry),
            ..Default::default()
        }
    }

    /// This node's own address.
    pub fn addr(&self) -> NodeAddr {
        NodeAddr::new(self.host.clone(), self.port)
    }

    /// Get the round-trip bound as a Duration.
    pub fn round_trip_timeout(&self) -> Duration {
        Duration::from_secs(self.round_trip_timeout_secs)
    }

    /// Validate configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.name.is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.host.is_empty() {
            return Err("host must not be empty".to_string());
        }
        if self.round_trip_timeout_secs == 0 {
            return Err("round_trip_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = NodeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.round_trip_timeout_secs, DEFAULT_ROUND_TRIP_TIMEOUT_SECS);
        assert_eq!(
            config.round_trip_timeout(),
            Duration::from_secs(DEFAULT_ROUND_TRIP_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = NodeConfig {
            round_trip_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_joining_carries_entry() {
        let entry = NodeAddr::new("10.0.0.1", 9000);
        let config = NodeConfig::joining("peer", "127.0.0.1", 8081, entry.clone());
        assert_eq!(config.entry, Some(entry));
        assert_eq!(config.addr(), NodeAddr::new("127.0.0.1", 8081));
    }
}
