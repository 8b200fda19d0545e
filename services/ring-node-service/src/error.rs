//! HTTP error mapping for the ring node service.

use actix_web::{HttpResponse, ResponseError};
use ringrelay_ring::RingError;
use thiserror::Error;

/// Errors a handler can answer with.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Ring protocol failure
    #[error(transparent)]
    Ring(#[from] RingError),

    /// Request body could not be decoded
    #[error("invalid payload encoding: {0}")]
    BadPayload(String),
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Ring(RingError::NoWaitingMessage) => {
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "no_waiting_message",
                    "message": self.to_string()
                }))
            }
            Self::Ring(RingError::OriginateBusy) => {
                HttpResponse::Conflict().json(serde_json::json!({
                    "error": "originate_busy",
                    "message": self.to_string()
                }))
            }
            Self::Ring(RingError::RoundTripTimeout { .. }) => {
                HttpResponse::GatewayTimeout().json(serde_json::json!({
                    "error": "round_trip_timeout",
                    "message": self.to_string()
                }))
            }
            Self::Ring(RingError::RelayUnreachable(_)) => {
                HttpResponse::BadGateway().json(serde_json::json!({
                    "error": "relay_unreachable",
                    "message": self.to_string()
                }))
            }
            Self::BadPayload(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "bad_payload",
                "message": self.to_string()
            })),
            _ => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "internal_error",
                "message": "An internal error occurred"
            })),
        }
    }
}
