use super::{
    handler::{handle_inclusion_proof, handle_method_not_allowed},
    GatewayState,
};
use axum::{routing::post, Router};
use std::sync::Arc;

pub(crate) fn routes(state: Arc<GatewayState>) -> Router {
    Router::new()
        .route(
            "/api/v1/clients/inclusion_proof",
            post(handle_inclusion_proof).fallback(handle_method_not_allowed),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::inclusion_proof::config::{GatewayConfig, SequencerEndpoint};
    use crate::plugins::inclusion_proof::revocation::{RevocationError, RevocationStore};
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use mockito::Matcher;
    use serde_json::{json, Value};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::util::ServiceExt;

    struct MockRevocationStore {
        revoked: HashSet<String>,
        calls: AtomicUsize,
    }

    impl MockRevocationStore {
        fn new(revoked: &[&str]) -> Self {
            Self {
                revoked: revoked.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RevocationStore for MockRevocationStore {
        async fn is_revoked(&self, identity_commitment: &str) -> Result<bool, RevocationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.revoked.contains(identity_commitment))
        }
    }

    struct FailingRevocationStore;

    #[async_trait]
    impl RevocationStore for FailingRevocationStore {
        async fn is_revoked(&self, _identity_commitment: &str) -> Result<bool, RevocationError> {
            Err(RevocationError::Query("store offline".to_owned()))
        }
    }

    fn gateway_routes(sequencer_url: &str, store: Arc<dyn RevocationStore>) -> Router {
        let config = GatewayConfig {
            graphql_endpoint: "http://graphql.invalid/v1/graphql".to_owned(),
            staging: SequencerEndpoint {
                base_url: sequencer_url.to_owned(),
                api_key: "staging-key".to_owned(),
            },
            production: SequencerEndpoint {
                base_url: sequencer_url.to_owned(),
                api_key: "prod-key".to_owned(),
            },
        };

        routes(Arc::new(GatewayState {
            config,
            http: reqwest::Client::new(),
            revocation: store,
        }))
    }

    fn setup(
        sequencer_url: &str,
        revoked: &[&str],
    ) -> (Router, Arc<MockRevocationStore>) {
        let store = Arc::new(MockRevocationStore::new(revoked));

        (gateway_routes(sequencer_url, store.clone()), store)
    }

    async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/v1/clients/inclusion_proof")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn proof_request(env: &str) -> Value {
        json!({
            "credential_type": "phone",
            "identity_commitment": "0x1234",
            "env": env,
        })
    }

    #[tokio::test]
    async fn test_get_is_rejected_without_upstream_calls() {
        let mut server = mockito::Server::new_async().await;
        let sequencer = server
            .mock("POST", "/inclusionProof")
            .expect(0)
            .create_async()
            .await;

        let (app, store) = setup(&server.url(), &[]);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/v1/clients/inclusion_proof")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["code"], "method_not_allowed");
        assert!(body["detail"].as_str().unwrap().contains("GET"));
        assert_eq!(store.calls(), 0);
        sequencer.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_attributes_are_named() {
        let server = mockito::Server::new_async().await;
        let (app, _) = setup(&server.url(), &[]);

        for attribute in ["credential_type", "identity_commitment", "env"] {
            let mut body = proof_request("staging");
            body.as_object_mut().unwrap().remove(attribute);

            let (status, body) = post_json(app.clone(), body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["code"], "required");
            assert_eq!(body["attribute"], attribute);
        }
    }

    #[tokio::test]
    async fn test_invalid_environment_is_rejected() {
        let server = mockito::Server::new_async().await;
        let (app, _) = setup(&server.url(), &[]);

        let (status, body) = post_json(app, proof_request("development")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid");
        assert_eq!(body["attribute"], "env");
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("`staging` or `production` expected"));
    }

    #[tokio::test]
    async fn test_unsupported_credential_type_is_rejected() {
        let server = mockito::Server::new_async().await;
        let (app, _) = setup(&server.url(), &[]);

        let mut body = proof_request("staging");
        body["credential_type"] = json!("orb");

        let (status, body) = post_json(app, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid");
        assert_eq!(body["attribute"], "credential_type");
    }

    #[tokio::test]
    async fn test_revoked_commitment_never_reaches_the_sequencer() {
        let mut server = mockito::Server::new_async().await;
        let sequencer = server
            .mock("POST", "/inclusionProof")
            .expect(0)
            .create_async()
            .await;

        let (app, store) = setup(&server.url(), &["0x1234"]);

        let (status, body) = post_json(app, proof_request("staging")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "unverified_identity");
        assert_eq!(body["attribute"], "identity_commitment");
        assert_eq!(store.calls(), 1);
        sequencer.assert_async().await;
    }

    #[tokio::test]
    async fn test_proof_payload_is_passed_through_unmodified() {
        let mut server = mockito::Server::new_async().await;
        let proof = json!({"root": "0xabc", "proof": ["0x1", "0x2"], "index": 42});

        // Production env must select the production bearer key.
        let sequencer = server
            .mock("POST", "/inclusionProof")
            .match_header("authorization", "Bearer prod-key")
            .match_body(Matcher::Json(json!([1, "0x1234"])))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(proof.to_string())
            .create_async()
            .await;

        let (app, _) = setup(&server.url(), &[]);

        let (status, body) = post_json(app, proof_request("production")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["inclusion_proof"], proof);
        sequencer.assert_async().await;
    }

    #[tokio::test]
    async fn test_staging_env_selects_the_staging_key() {
        let mut server = mockito::Server::new_async().await;

        let sequencer = server
            .mock("POST", "/inclusionProof")
            .match_header("authorization", "Bearer staging-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let (app, _) = setup(&server.url(), &[]);

        let (status, _) = post_json(app, proof_request("staging")).await;

        assert_eq!(status, StatusCode::OK);
        sequencer.assert_async().await;
    }

    #[tokio::test]
    async fn test_accepted_commitment_reports_pending_inclusion() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/inclusionProof")
            .with_status(202)
            .create_async()
            .await;

        let (app, _) = setup(&server.url(), &[]);

        let (status, body) = post_json(app, proof_request("staging")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "inclusion_pending");
        assert!(body.get("inclusion_proof").is_none());
    }

    #[tokio::test]
    async fn test_known_rejection_maps_to_its_table_entry() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/inclusionProof")
            .with_status(400)
            .with_body("provided identity commitment is invalid")
            .create_async()
            .await;

        let (app, _) = setup(&server.url(), &[]);

        let (status, body) = post_json(app, proof_request("staging")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_identity");
        assert_eq!(
            body["detail"],
            "This identity is not verified for the relevant credential."
        );
    }

    #[tokio::test]
    async fn test_unrecognized_rejection_collapses_to_server_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/inclusionProof")
            .with_status(400)
            .with_body("some novel upstream failure")
            .create_async()
            .await;

        let (app, _) = setup(&server.url(), &[]);

        let (status, body) = post_json(app, proof_request("staging")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "server_error");
        assert!(body["detail"].as_str().unwrap().contains("Unable to get proof"));
    }

    #[tokio::test]
    async fn test_revocation_store_failure_collapses_to_service_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let sequencer = server
            .mock("POST", "/inclusionProof")
            .expect(0)
            .create_async()
            .await;

        let app = gateway_routes(&server.url(), Arc::new(FailingRevocationStore));

        let (status, body) = post_json(app, proof_request("staging")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "server_error");
        assert_eq!(body["detail"], "Something went wrong. Please try again.");
        sequencer.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_sequencer_collapses_to_service_unavailable() {
        // Nothing listens on the discard port, the connection is refused.
        let (app, store) = setup("http://127.0.0.1:9", &[]);

        let (status, body) = post_json(app, proof_request("staging")).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "server_error");
        assert_eq!(store.calls(), 1);
    }

    #[tokio::test]
    async fn test_unexpected_statuses_collapse_to_service_unavailable() {
        for upstream_status in [500_usize, 503, 301] {
            let mut server = mockito::Server::new_async().await;

            server
                .mock("POST", "/inclusionProof")
                .with_status(upstream_status)
                .create_async()
                .await;

            let (app, _) = setup(&server.url(), &[]);

            let (status, body) = post_json(app, proof_request("staging")).await;

            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body["code"], "server_error");
        }
    }
}
