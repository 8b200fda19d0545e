//! Transport boundary for outbound calls to other ring members.
//!
//! The core issues exactly two request shapes: registration against an entry
//! node and relaying a payload plus its signature chain to a successor. How
//! those travel (HTTP, in-process, a test double) is the transport's
//! business.

use async_trait::async_trait;
use dashmap::DashMap;
use ringrelay_core::{NodeAddr, RegistrationGrant, Signature, SignatureChain};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::node::RingNode;

/// Transport-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer could not be reached at all
    #[error("peer {addr} unreachable: {reason}")]
    Unreachable { addr: NodeAddr, reason: String },

    /// The peer answered with something the protocol does not allow
    #[error("protocol error from {addr}: {reason}")]
    Protocol { addr: NodeAddr, reason: String },
}

/// Outbound calls the ring protocol makes to its peers.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Register `host:port` under `name` with the coordinator at `entry`.
    async fn register(
        &self,
        entry: &NodeAddr,
        host: &str,
        port: u16,
        name: &str,
    ) -> Result<RegistrationGrant, TransportError>;

    /// Deliver a payload and its accumulated chain to `target`, returning
    /// the signature `target` produced for its own hop.
    async fn relay(
        &self,
        target: &NodeAddr,
        payload: &[u8],
        content_type: &str,
        chain: &SignatureChain,
    ) -> Result<Signature, TransportError>;
}

/// In-process transport wiring [`RingNode`]s together directly.
///
/// Useful for tests and for running a whole ring inside one process.
#[derive(Default)]
pub struct InMemoryTransport {
    nodes: DashMap<NodeAddr, Arc<RingNode>>,
}

impl InMemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `node` reachable at its own address.
    pub fn add_node(&self, node: Arc<RingNode>) {
        self.nodes.insert(node.addr().clone(), node);
    }

    fn lookup(&self, addr: &NodeAddr) -> Result<Arc<RingNode>, TransportError> {
        self.nodes
            .get(addr)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| TransportError::Unreachable {
                addr: addr.clone(),
                reason: "no node bound at this address".to_string(),
            })
    }
}

#[async_trait]
impl RelayTransport for InMemoryTransport {
    async fn register(
        &self,
        entry: &NodeAddr,
        host: &str,
        port: u16,
        name: &str,
    ) -> Result<RegistrationGrant, TransportError> {
        debug!(%entry, host, port, name, "in-memory register");
        let node = self.lookup(entry)?;
        Ok(node.register_peer(host, port))
    }

    async fn relay(
        &self,
        target: &NodeAddr,
        payload: &[u8],
        content_type: &str,
        chain: &SignatureChain,
    ) -> Result<Signature, TransportError> {
        let node = self.lookup(target)?;
        node.relay_message(payload, content_type, chain.clone())
            .await
            .map_err(|e| TransportError::Protocol {
                addr: target.clone(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_address_is_unreachable() {
        let transport = InMemoryTransport::new();
        let err = transport
            .relay(
                &NodeAddr::new("10.9.9.9", 1),
                b"payload",
                "text/plain",
                &SignatureChain::empty(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::Unreachable { .. }));
    }
}
