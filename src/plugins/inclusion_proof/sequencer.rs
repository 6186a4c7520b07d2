use super::config::SequencerEndpoint;
use axum::http::StatusCode;
use serde_json::{json, Value};

/// On-chain group phone credential commitments are inserted into.
pub(crate) const PHONE_GROUP_ID: u64 = 1;

/// Raw outcome of an inclusion-proof call, before normalization into the
/// caller-facing response shape.
#[derive(Debug)]
pub(crate) enum SequencerReply {
    /// 200: the proof payload, passed through untouched.
    Included(Value),
    /// 202: the commitment is accepted but not yet included on-chain.
    Pending,
    /// 400: the rejection body, matched against the known-error table.
    Rejected(String),
    /// Any other status.
    Failed { status: StatusCode, body: String },
}

/// Thin client over one environment's signup sequencer.
pub(crate) struct SequencerClient<'a> {
    endpoint: &'a SequencerEndpoint,
    http: &'a reqwest::Client,
}

impl<'a> SequencerClient<'a> {
    pub(crate) fn new(endpoint: &'a SequencerEndpoint, http: &'a reqwest::Client) -> Self {
        Self { endpoint, http }
    }

    /// Request an inclusion proof for the commitment. The wire format is the
    /// ordered pair `[group_id, identity_commitment]` under a bearer key.
    pub(crate) async fn inclusion_proof(
        &self,
        group_id: u64,
        identity_commitment: &str,
    ) -> Result<SequencerReply, reqwest::Error> {
        let response = self
            .http
            .post(format!("{}/inclusionProof", self.endpoint.base_url))
            .bearer_auth(&self.endpoint.api_key)
            .json(&json!([group_id, identity_commitment]))
            .send()
            .await?;

        let status = response.status();
        match status.as_u16() {
            200 => Ok(SequencerReply::Included(response.json().await?)),
            202 => Ok(SequencerReply::Pending),
            400 => Ok(SequencerReply::Rejected(
                response.text().await.unwrap_or_default(),
            )),
            _ => Ok(SequencerReply::Failed {
                status,
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
