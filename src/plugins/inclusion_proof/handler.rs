use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{
    errors::{GatewayError, EXPECTED_SEQUENCER_ERRORS},
    model::ProofRequest,
    sequencer::{SequencerClient, SequencerReply},
    GatewayState,
};

/// Checks whether the identity commitment is in the revocation table and, if
/// not, queries an inclusion proof from the relevant signup sequencer.
///
/// Linear pipeline, every branch terminal: validate, check revocation, proxy,
/// normalize. No retries are attempted here; `inclusion_pending` advises the
/// caller to retry instead.
pub(crate) async fn handle_inclusion_proof(
    State(state): State<Arc<GatewayState>>,
    body: Option<Json<Value>>,
) -> Response {
    // An absent or malformed body fails the required-attribute checks.
    let Json(body) = body.unwrap_or_else(|| Json(json!({})));

    let request = match ProofRequest::parse(&body) {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    // Commitment in the revocation table, deny the proof request
    match state.revocation.is_revoked(&request.identity_commitment).await {
        Ok(true) => {
            tracing::info!(
                "declined inclusion proof request for revoked commitment: {}",
                request.identity_commitment
            );
            return GatewayError::UnverifiedIdentity.into_response();
        }
        Ok(false) => (),
        Err(err) => {
            tracing::error!("revocation store lookup failed: {err}");
            return GatewayError::ServiceUnavailable.into_response();
        }
    }

    // Commitment not revoked, query the environment's sequencer for a proof
    let sequencer = SequencerClient::new(state.config.sequencer(request.env), &state.http);

    match sequencer
        .inclusion_proof(
            request.credential_type.group_id(),
            &request.identity_commitment,
        )
        .await
    {
        Ok(SequencerReply::Included(proof)) => {
            (StatusCode::OK, Json(json!({ "inclusion_proof": proof }))).into_response()
        }
        Ok(SequencerReply::Pending) => GatewayError::InclusionPending.into_response(),
        Ok(SequencerReply::Rejected(error)) => {
            match EXPECTED_SEQUENCER_ERRORS.get(error.as_str()) {
                Some(known) => GatewayError::KnownSequencerError(known.clone()).into_response(),
                None => {
                    tracing::error!(
                        "unexpected error (400) fetching proof from phone sequencer: {error}"
                    );
                    GatewayError::ProofUnavailable.into_response()
                }
            }
        }
        Ok(SequencerReply::Failed { status, body }) => {
            tracing::error!(
                "unexpected error ({status}) fetching proof from phone sequencer: {body}"
            );
            GatewayError::ServiceUnavailable.into_response()
        }
        Err(err) => {
            tracing::error!("failed to reach phone sequencer: {err}");
            GatewayError::ServiceUnavailable.into_response()
        }
    }
}

/// Every non-POST method lands here and is named in the rejection.
pub(crate) async fn handle_method_not_allowed(method: Method) -> Response {
    GatewayError::MethodNotAllowed(method).into_response()
}
