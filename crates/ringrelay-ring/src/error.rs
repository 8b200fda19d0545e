//! Ring protocol error types.

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias
pub type Result<T> = std::result::Result<T, RingError>;

/// Errors surfaced by the ring protocol.
#[derive(Debug, Error)]
pub enum RingError {
    /// A terminal relay arrived but nothing is waiting for a round trip
    #[error("no waiting message")]
    NoWaitingMessage,

    /// The outbound call to the successor failed
    #[error("relay target unreachable: {0}")]
    RelayUnreachable(#[from] TransportError),

    /// A round trip is already outstanding at this node
    #[error("an origination is already in flight")]
    OriginateBusy,

    /// The ring did not close within the configured bound
    #[error("round trip timed out after {waited_secs}s")]
    RoundTripTimeout { waited_secs: u64 },

    /// The completion channel was dropped before a result was published
    #[error("round trip aborted before a result was published")]
    ResultChannelClosed,

    /// A node tried to join a ring without an entry node configured
    #[error("no entry node configured")]
    NoEntryConfigured,
}
