//! Ring-topology formation and the relay/signature-chain protocol.
//!
//! A [`RingNode`] is either the coordinator ([`NodeRole::Origin`]) or a
//! relay that registered with a coordinator ([`NodeRole::Relay`]). The
//! coordinator owns the [`RingRegistry`] and assigns every new registrant a
//! successor; messages originated at the coordinator travel successor to
//! successor around the whole ring and back, growing a signature chain one
//! hop at a time.
//!
//! Actual network I/O lives behind the [`RelayTransport`] trait; the crate
//! ships an [`InMemoryTransport`] for tests and single-process rings.

mod config;
mod error;
mod node;
mod registry;
mod transport;

pub use config::{NodeConfig, DEFAULT_ROUND_TRIP_TIMEOUT_SECS};
pub use error::{Result, RingError};
pub use node::{NodeRole, RingNode};
pub use registry::RingRegistry;
pub use transport::{InMemoryTransport, RelayTransport, TransportError};
