use super::errors::GatewayError;
use super::sequencer::PHONE_GROUP_ID;
use serde_json::Value;

/// Deployment environments a proof request may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Environment {
    Staging,
    Production,
}

/// Capability set of credentials the gateway can route. Supporting another
/// credential means adding a variant here along with its parse rule and
/// sequencer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CredentialType {
    Phone,
}

impl CredentialType {
    /// On-chain group this credential's commitments are inserted into.
    pub(crate) fn group_id(self) -> u64 {
        match self {
            CredentialType::Phone => PHONE_GROUP_ID,
        }
    }
}

/// A validated inclusion-proof request. Request-scoped only; nothing is
/// persisted by the gateway.
#[derive(Debug, Clone)]
pub(crate) struct ProofRequest {
    pub(crate) credential_type: CredentialType,
    pub(crate) identity_commitment: String,
    pub(crate) env: Environment,
}

impl ProofRequest {
    /// Validate the inbound JSON body field by field, so callers are told
    /// exactly which attribute is missing or invalid. The required gate only
    /// rejects absent or empty values; a present value of the wrong shape
    /// falls through to the domain checks and is reported as invalid.
    pub(crate) fn parse(body: &Value) -> Result<Self, GatewayError> {
        let credential_type = require(body, "credential_type")?;
        let identity_commitment = require(body, "identity_commitment")?;
        let env = require(body, "env")?;

        let env = match env.as_str() {
            Some("staging") => Environment::Staging,
            Some("production") => Environment::Production,
            _ => {
                return Err(GatewayError::InvalidField {
                    field: "env",
                    detail: "Invalid environment value. `staging` or `production` expected.",
                })
            }
        };

        let credential_type = match credential_type.as_str() {
            Some("phone") => CredentialType::Phone,
            _ => {
                return Err(GatewayError::InvalidField {
                    field: "credential_type",
                    detail: "Invalid credential type. Only `phone` is supported for now.",
                })
            }
        };

        let identity_commitment = match identity_commitment.as_str() {
            Some(s) => s.to_owned(),
            None => {
                return Err(GatewayError::InvalidField {
                    field: "identity_commitment",
                    detail: "Invalid identity commitment. A string value is expected.",
                })
            }
        };

        Ok(Self {
            credential_type,
            identity_commitment,
            env,
        })
    }
}

fn require<'a>(body: &'a Value, attr: &'static str) -> Result<&'a Value, GatewayError> {
    body.get(attr)
        .filter(|value| !is_empty(value))
        .ok_or(GatewayError::MissingAttribute(attr))
}

/// Null, empty strings, `false` and zero all count as not provided.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
