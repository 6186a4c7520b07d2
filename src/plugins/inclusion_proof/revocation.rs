use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Existence query against the revocation table. A non-empty result means
/// the commitment has been revoked for the credential.
const IDENTITY_COMMITMENT_EXISTS_QUERY: &str = r#"
    query IdentityCommitmentExists($identity_commitment: String!) {
        revocation(where: { identity_commitment: { _eq: $identity_commitment } }) {
            identity_commitment
        }
    }
"#;

#[derive(Debug, Error)]
pub(crate) enum RevocationError {
    #[error("revocation store transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("revocation store returned errors: {0}")]
    Query(String),
}

/// Read-only view on the store of revoked identity commitments.
#[async_trait]
pub(crate) trait RevocationStore: Send + Sync {
    async fn is_revoked(&self, identity_commitment: &str) -> Result<bool, RevocationError>;
}

/// Revocation store backed by the GraphQL API service.
pub(crate) struct GraphQlRevocationStore {
    endpoint: String,
    http: reqwest::Client,
}

impl GraphQlRevocationStore {
    pub(crate) fn new(endpoint: String, http: reqwest::Client) -> Self {
        Self { endpoint, http }
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    data: Option<QueryData>,
    errors: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct QueryData {
    #[serde(default)]
    revocation: Vec<RevocationRecord>,
}

#[derive(Deserialize)]
struct RevocationRecord {
    #[allow(dead_code)]
    identity_commitment: String,
}

#[async_trait]
impl RevocationStore for GraphQlRevocationStore {
    async fn is_revoked(&self, identity_commitment: &str) -> Result<bool, RevocationError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({
                "query": IDENTITY_COMMITMENT_EXISTS_QUERY,
                "variables": { "identity_commitment": identity_commitment },
            }))
            .send()
            .await?
            .error_for_status()?;

        let body: QueryResponse = response.json().await?;

        if let Some(errors) = body.errors {
            return Err(RevocationError::Query(errors.to_string()));
        }

        Ok(body
            .data
            .map(|data| !data.revocation.is_empty())
            .unwrap_or_default())
    }
}
