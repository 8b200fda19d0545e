//! Data model shared by every RingRelay component.

use ringrelay_hash::{PayloadHash, Salt};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Network address of a ring member.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddr {
    pub host: String,
    pub port: u16,
}

impl NodeAddr {
    /// Create a new address.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for NodeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Opaque token identifying a single registrant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MembershipId(String);

impl MembershipId {
    /// Create a new random membership id.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MembershipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MembershipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registry entry at the coordinator. Immutable once appended.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeRecord {
    /// The member's own address.
    pub addr: NodeAddr,
    /// Token handed to the member at registration.
    pub membership_id: MembershipId,
    /// Salt minted for the member at registration.
    pub assigned_salt: Salt,
}

/// What a registrant receives back from the coordinator.
///
/// The granted salt is freshly minted and independent of the salt stored in
/// the registry record; nodes sign with their own local salt either way.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationGrant {
    /// The node this registrant must forward relayed messages to.
    pub successor: NodeAddr,
    pub membership_id: MembershipId,
    pub assigned_salt: Salt,
}

/// One hop's signature over a relayed payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Name of the signing node.
    pub signer: String,
    /// Salted hash of the payload as seen by the signer.
    pub payload_hash: PayloadHash,
    /// Content type the payload arrived with.
    pub content_type: String,
    /// Payload length in bytes.
    pub content_length: usize,
}

/// Ordered accumulation of per-hop signatures, first hop first.
///
/// Append-only: the chain only grows, by concatenation via [`with`].
///
/// [`with`]: SignatureChain::with
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureChain {
    pub items: Vec<Signature>,
}

impl SignatureChain {
    /// The empty chain a round trip starts from.
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Return a new chain with `signature` appended.
    pub fn with(&self, signature: Signature) -> Self {
        let mut items = self.items.clone();
        items.push(signature);
        Self { items }
    }

    /// Number of hops signed so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no hop has signed yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate the signatures in traversal order.
    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.items.iter()
    }

    /// Signer names in traversal order.
    pub fn signers(&self) -> Vec<&str> {
        self.items.iter().map(|s| s.signer.as_str()).collect()
    }
}

/// Outcome of a completed round trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayStatus {
    Success,
    Failure,
}

/// Result published to the caller that originated a message.
///
/// `status` is `Success` iff the payload came back byte-identical, i.e. the
/// hash computed on return equals the hash recorded at origination.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayResult {
    pub status: PlayStatus,
    pub original_hash: PayloadHash,
    pub received_hash: PayloadHash,
    pub received_length: usize,
    pub received_content_type: String,
    pub signature_chain: SignatureChain,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringrelay_hash::salted_hash;

    fn signature(signer: &str) -> Signature {
        let salt = Salt::generate();
        Signature {
            signer: signer.to_string(),
            payload_hash: salted_hash(b"payload", &salt),
            content_type: "text/plain".to_string(),
            content_length: 7,
        }
    }

    #[test]
    fn test_chain_grows_by_concatenation() {
        let chain = SignatureChain::empty();
        assert!(chain.is_empty());

        let one = chain.with(signature("alpha"));
        let two = one.with(signature("beta"));

        // earlier chains are untouched
        assert_eq!(chain.len(), 0);
        assert_eq!(one.len(), 1);
        assert_eq!(two.len(), 2);
        assert_eq!(two.signers(), vec!["alpha", "beta"]);
    }

    #[test]
    fn test_membership_ids_unique() {
        assert_ne!(MembershipId::new(), MembershipId::new());
    }

    #[test]
    fn test_node_addr_display() {
        let addr = NodeAddr::new("localhost", 8080);
        assert_eq!(addr.to_string(), "localhost:8080");
    }

    #[test]
    fn test_signature_chain_serde_roundtrip() {
        let chain = SignatureChain::empty()
            .with(signature("alpha"))
            .with(signature("beta"));

        let json = serde_json::to_string(&chain).unwrap();
        let back: SignatureChain = serde_json::from_str(&json).unwrap();
        assert_eq!(chain, back);
    }

    #[test]
    fn test_play_status_wire_form() {
        assert_eq!(
            serde_json::to_string(&PlayStatus::Success).unwrap(),
            "\"Success\""
        );
        assert_eq!(
            serde_json::to_string(&PlayStatus::Failure).unwrap(),
            "\"Failure\""
        );
    }
}
