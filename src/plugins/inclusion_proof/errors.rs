use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Normalized `{code, detail}` pair a sequencer rejection translates to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimplifiedError {
    pub(crate) code: &'static str,
    pub(crate) detail: &'static str,
}

lazy_static! {
    /// Sequencer rejection bodies this gateway knows how to translate.
    /// Anything else collapses into a generic server error so upstream
    /// internals never leak to callers.
    pub(crate) static ref EXPECTED_SEQUENCER_ERRORS: HashMap<&'static str, SimplifiedError> =
        HashMap::from([(
            "provided identity commitment is invalid",
            SimplifiedError {
                code: "invalid_identity",
                detail: "This identity is not verified for the relevant credential.",
            },
        )]);
}

/// Terminal outcomes of the proof pipeline, surfaced to callers as a stable
/// `{code, detail}` JSON shape. The gateway never retries on its own;
/// `InclusionPending` tells the caller to.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum GatewayError {
    #[error("HTTP method `{0}` not allowed")]
    MethodNotAllowed(Method),
    #[error("missing required attribute `{0}`")]
    MissingAttribute(&'static str),
    #[error("invalid value for `{field}`")]
    InvalidField {
        field: &'static str,
        detail: &'static str,
    },
    #[error("identity commitment is revoked")]
    UnverifiedIdentity,
    #[error("inclusion on-chain is still pending")]
    InclusionPending,
    #[error("sequencer rejected the request: {}", .0.code)]
    KnownSequencerError(SimplifiedError),
    #[error("sequencer rejected the request for an unrecognized reason")]
    ProofUnavailable,
    #[error("sequencer unavailable")]
    ServiceUnavailable,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<&'static str>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            GatewayError::MethodNotAllowed(method) => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody {
                    code: "method_not_allowed",
                    detail: format!("HTTP method `{method}` is not allowed for this endpoint."),
                    attribute: None,
                },
            ),
            GatewayError::MissingAttribute(attribute) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "required",
                    detail: "This attribute is required.".to_owned(),
                    attribute: Some(attribute),
                },
            ),
            GatewayError::InvalidField { field, detail } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "invalid",
                    detail: detail.to_owned(),
                    attribute: Some(field),
                },
            ),
            GatewayError::UnverifiedIdentity => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "unverified_identity",
                    detail: "This identity is not verified for the phone credential.".to_owned(),
                    attribute: Some("identity_commitment"),
                },
            ),
            GatewayError::InclusionPending => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "inclusion_pending",
                    detail: "This identity is in progress of being included on-chain. \
                             Please wait a few minutes and try again."
                        .to_owned(),
                    attribute: None,
                },
            ),
            GatewayError::KnownSequencerError(error) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: error.code,
                    detail: error.detail.to_owned(),
                    attribute: None,
                },
            ),
            GatewayError::ProofUnavailable => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "server_error",
                    detail: "Unable to get proof for this identity. Please try again later."
                        .to_owned(),
                    attribute: None,
                },
            ),
            GatewayError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorBody {
                    code: "server_error",
                    detail: "Something went wrong. Please try again.".to_owned(),
                    attribute: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
