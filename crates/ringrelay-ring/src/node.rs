//! Ring node: per-hop signing/forwarding and the round-trip coordinator.
//!
//! A node is classified exactly once, at construction: the coordinator runs
//! as [`NodeRole::Origin`] and terminates round trips, every node that
//! registered somewhere runs as [`NodeRole::Relay`] and forwards to its
//! assigned successor. There are no other states and the classification
//! never changes.

use ringrelay_core::{
    MembershipId, NodeAddr, PlayResult, PlayStatus, RegistrationGrant, Signature, SignatureChain,
};
use ringrelay_hash::{salted_hash, PayloadHash, Salt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use crate::config::NodeConfig;
use crate::error::{Result, RingError};
use crate::registry::RingRegistry;
use crate::transport::RelayTransport;

/// What a node does with an incoming relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeRole {
    /// The coordinator: no successor, an incoming relay means the ring has
    /// closed.
    Origin,
    /// A mid-ring member forwarding every relay to its assigned successor.
    Relay { successor: NodeAddr },
}

/// The message a node is currently waiting to see come back around.
#[derive(Debug)]
struct PendingPlay {
    original_hash: PayloadHash,
    content_type: String,
    content_length: usize,
}

/// Single-slot rendezvous between `originate` and the terminal relay step.
struct PendingSlot {
    play: PendingPlay,
    done: oneshot::Sender<PlayResult>,
}

/// A member of the relay ring.
pub struct RingNode {
    name: String,
    addr: NodeAddr,
    // local signing salt, minted at startup; distinct from any salt a
    // coordinator assigned at registration
    salt: Salt,
    role: NodeRole,
    assigned: Option<(MembershipId, Salt)>,
    registry: RingRegistry,
    pending: Mutex<Option<PendingSlot>>,
    transport: Arc<dyn RelayTransport>,
    round_trip_timeout: Duration,
}

impl RingNode {
    /// Create the coordinator node of a new ring.
    pub fn coordinator(config: &NodeConfig, transport: Arc<dyn RelayTransport>) -> Self {
        info!(name = %config.name, addr = %config.addr(), "starting coordinator node");
        Self {
            name: config.name.clone(),
            addr: config.addr(),
            salt: Salt::generate(),
            role: NodeRole::Origin,
            assigned: None,
            registry: RingRegistry::new(config.addr()),
            pending: Mutex::new(None),
            transport,
            round_trip_timeout: config.round_trip_timeout(),
        }
    }

    /// Join an existing ring through the entry node in `config`.
    pub async fn join(config: &NodeConfig, transport: Arc<dyn RelayTransport>) -> Result<Self> {
        let entry = config.entry.clone().ok_or(RingError::NoEntryConfigured)?;

        let grant = transport
            .register(&entry, &config.host, config.port, &config.name)
            .await?;
        info!(
            name = %config.name,
            %entry,
            successor = %grant.successor,
            membership_id = %grant.membership_id,
            "joined ring"
        );

        Ok(Self {
            name: config.name.clone(),
            addr: config.addr(),
            salt: Salt::generate(),
            role: NodeRole::Relay {
                successor: grant.successor,
            },
            assigned: Some((grant.membership_id, grant.assigned_salt)),
            registry: RingRegistry::new(config.addr()),
            pending: Mutex::new(None),
            transport,
            round_trip_timeout: config.round_trip_timeout(),
        })
    }

    /// This node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This node's own address.
    pub fn addr(&self) -> &NodeAddr {
        &self.addr
    }

    /// This node's role, fixed at construction.
    pub fn role(&self) -> &NodeRole {
        &self.role
    }

    /// The membership id granted at registration, if this node joined a
    /// ring.
    pub fn membership_id(&self) -> Option<&MembershipId> {
        self.assigned.as_ref().map(|(id, _)| id)
    }

    /// The salt granted at registration, if this node joined a ring.
    ///
    /// Kept separate from the local signing salt; signatures never use it.
    pub fn assigned_salt(&self) -> Option<&Salt> {
        self.assigned.as_ref().map(|(_, salt)| salt)
    }

    /// Handle a registration request from a new ring member.
    pub fn register_peer(&self, host: &str, port: u16) -> RegistrationGrant {
        self.registry.register(host, port)
    }

    /// Number of registry records this node holds (zero until a
    /// registration or origination bootstraps the registry).
    pub fn ring_members(&self) -> usize {
        self.registry.len()
    }

    /// Handle an incoming relay.
    ///
    /// A relay node signs and forwards to its successor; the origin treats
    /// the relay as ring closure, consumes the pending slot exactly once and
    /// publishes the [`PlayResult`]. Either way the caller (the previous
    /// hop) gets this node's own signature back.
    pub async fn relay_message(
        &self,
        payload: &[u8],
        content_type: &str,
        chain: SignatureChain,
    ) -> Result<Signature> {
        let received_hash = salted_hash(payload, &self.salt);
        let received_length = payload.len();

        match &self.role {
            NodeRole::Relay { successor } => {
                debug!(%successor, hops = chain.len(), "forwarding relay");
                self.send_relay(payload, content_type, successor, &chain)
                    .await?;
            }
            NodeRole::Origin => {
                let slot = self
                    .pending
                    .lock()
                    .await
                    .take()
                    .ok_or(RingError::NoWaitingMessage)?;

                let status = if received_hash == slot.play.original_hash {
                    PlayStatus::Success
                } else {
                    PlayStatus::Failure
                };
                info!(
                    ?status,
                    hops = chain.len(),
                    original_length = slot.play.content_length,
                    original_content_type = %slot.play.content_type,
                    "ring closed"
                );

                let result = PlayResult {
                    status,
                    original_hash: slot.play.original_hash,
                    received_hash: received_hash.clone(),
                    received_length,
                    received_content_type: content_type.to_string(),
                    signature_chain: chain,
                };
                if slot.done.send(result).is_err() {
                    warn!("originator gave up before the ring closed");
                }
            }
        }

        Ok(Signature {
            signer: self.name.clone(),
            payload_hash: received_hash,
            content_type: content_type.to_string(),
            content_length: received_length,
        })
    }

    /// Inject a message into the ring and wait for it to come back around.
    ///
    /// Single-slot: a second call while one is outstanding fails with
    /// [`RingError::OriginateBusy`]. The wait is bounded by the configured
    /// round-trip timeout.
    pub async fn originate(&self, payload: &[u8], content_type: &str) -> Result<PlayResult> {
        let original_hash = salted_hash(payload, &self.salt);
        let (done_tx, done_rx) = oneshot::channel();

        {
            let mut slot = self.pending.lock().await;
            if slot.is_some() {
                return Err(RingError::OriginateBusy);
            }
            *slot = Some(PendingSlot {
                play: PendingPlay {
                    original_hash,
                    content_type: content_type.to_string(),
                    content_length: payload.len(),
                },
                done: done_tx,
            });
        }

        let first_hop = self.registry.bootstrap_tail();
        info!(%first_hop, length = payload.len(), "originating round trip");

        if let Err(e) = self
            .send_relay(payload, content_type, &first_hop, &SignatureChain::empty())
            .await
        {
            // dispatch never left this node, release the slot
            self.pending.lock().await.take();
            return Err(e);
        }

        match tokio::time::timeout(self.round_trip_timeout, done_rx).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(_)) => Err(RingError::ResultChannelClosed),
            Err(_) => {
                self.pending.lock().await.take();
                Err(RingError::RoundTripTimeout {
                    waited_secs: self.round_trip_timeout.as_secs(),
                })
            }
        }
    }

    /// Sign with the local salt, extend the chain and dispatch to `target`.
    async fn send_relay(
        &self,
        payload: &[u8],
        content_type: &str,
        target: &NodeAddr,
        chain: &SignatureChain,
    ) -> Result<()> {
        let extended = chain.with(self.sign(payload, content_type));
        let hop_signature = self
            .transport
            .relay(target, payload, content_type, &extended)
            .await?;
        debug!(%target, hop_signer = %hop_signature.signer, "relay dispatched");
        Ok(())
    }

    fn sign(&self, payload: &[u8], content_type: &str) -> Signature {
        Signature {
            signer: self.name.clone(),
            payload_hash: salted_hash(payload, &self.salt),
            content_type: content_type.to_string(),
            content_length: payload.len(),
        }
    }
}
