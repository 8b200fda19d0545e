//! Wire shapes shared by the inbound HTTP surface and the outbound client.

use ringrelay_core::{MembershipId, NodeAddr, RegistrationGrant, SignatureChain};
use ringrelay_hash::Salt;
use serde::{Deserialize, Serialize};

/// Response body of `POST /register-node`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterNodeResponse {
    pub successor_host: String,
    pub successor_port: u16,
    pub uuid: String,
    pub salt: Salt,
}

impl From<RegistrationGrant> for RegisterNodeResponse {
    fn from(grant: RegistrationGrant) -> Self {
        Self {
            successor_host: grant.successor.host,
            successor_port: grant.successor.port,
            uuid: grant.membership_id.to_string(),
            salt: grant.assigned_salt,
        }
    }
}

impl RegisterNodeResponse {
    /// Convert back into the core grant type.
    pub fn into_grant(self) -> RegistrationGrant {
        RegistrationGrant {
            successor: NodeAddr::new(self.successor_host, self.successor_port),
            membership_id: MembershipId::from_string(self.uuid),
            assigned_salt: self.salt,
        }
    }
}

/// Request body of `POST /relay`.
///
/// The payload travels base64-encoded so arbitrary bytes survive the JSON
/// framing.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelayRequest {
    pub message: String,
    pub content_type: String,
    pub signatures: SignatureChain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_response_roundtrip() {
        let grant = RegistrationGrant {
            successor: NodeAddr::new("10.0.0.1", 9001),
            membership_id: MembershipId::new(),
            assigned_salt: Salt::generate(),
        };

        let response = RegisterNodeResponse::from(grant.clone());
        let back = response.into_grant();

        assert_eq!(back.successor, grant.successor);
        assert_eq!(back.membership_id, grant.membership_id);
        assert_eq!(back.assigned_salt, grant.assigned_salt);
    }
}
