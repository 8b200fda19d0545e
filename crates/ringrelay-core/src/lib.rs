//! Core types for the RingRelay message relay ring.
//!
//! Nodes join a logical ring through a coordinator node and forward messages
//! hop-by-hop, each hop appending a [`Signature`] to the message's
//! [`SignatureChain`] until the message returns to its origin.

mod types;

pub use types::{
    MembershipId, NodeAddr, NodeRecord, PlayResult, PlayStatus, RegistrationGrant, Signature,
    SignatureChain,
};
