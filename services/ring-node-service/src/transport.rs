//! Outbound HTTP transport towards other ring nodes.
//!
//! Issues the same two request shapes this service accepts inbound:
//! registration against an entry node and relaying to a successor.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use ringrelay_core::{NodeAddr, RegistrationGrant, Signature, SignatureChain};
use ringrelay_ring::{RelayTransport, TransportError};
use tracing::debug;

use crate::wire::{RegisterNodeResponse, RelayRequest};

/// HTTP implementation of the ring's outbound transport.
pub struct HttpRelayTransport {
    client: reqwest::Client,
}

impl HttpRelayTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    fn unreachable(addr: &NodeAddr, err: reqwest::Error) -> TransportError {
        TransportError::Unreachable {
            addr: addr.clone(),
            reason: err.to_string(),
        }
    }

    fn protocol(addr: &NodeAddr, err: reqwest::Error) -> TransportError {
        TransportError::Protocol {
            addr: addr.clone(),
            reason: err.to_string(),
        }
    }
}

impl Default for HttpRelayTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn register(
        &self,
        entry: &NodeAddr,
        host: &str,
        port: u16,
        name: &str,
    ) -> Result<RegistrationGrant, TransportError> {
        let url = format!("http://{entry}/register-node");
        debug!(%entry, "registering with entry node");

        let port = port.to_string();
        let response = self
            .client
            .post(&url)
            .query(&[("host", host), ("port", port.as_str()), ("name", name)])
            .send()
            .await
            .map_err(|e| Self::unreachable(entry, e))?
            .error_for_status()
            .map_err(|e| Self::protocol(entry, e))?;

        let body: RegisterNodeResponse = response
            .json()
            .await
            .map_err(|e| Self::protocol(entry, e))?;
        Ok(body.into_grant())
    }

    async fn relay(
        &self,
        target: &NodeAddr,
        payload: &[u8],
        content_type: &str,
        chain: &SignatureChain,
    ) -> Result<Signature, TransportError> {
        let url = format!("http://{target}/relay");
        let request = RelayRequest {
            message: STANDARD.encode(payload),
            content_type: content_type.to_string(),
            signatures: chain.clone(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::unreachable(target, e))?
            .error_for_status()
            .map_err(|e| Self::protocol(target, e))?;

        response.json().await.map_err(|e| Self::protocol(target, e))
    }
}
