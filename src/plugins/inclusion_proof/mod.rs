mod config;
mod errors;
mod handler;
mod model;
mod revocation;
mod sequencer;
mod web;

use crate::plugin::{Plugin, PluginError};
use axum::Router;
use config::GatewayConfig;
use revocation::{GraphQlRevocationStore, RevocationStore};
use std::sync::Arc;

/// Shared per-process resources of the gateway: resolved configuration, the
/// outbound connection pool and the revocation store handle. Requests hold
/// no state of their own beyond this.
pub(crate) struct GatewayState {
    pub(crate) config: GatewayConfig,
    pub(crate) http: reqwest::Client,
    pub(crate) revocation: Arc<dyn RevocationStore>,
}

#[derive(Default)]
pub(crate) struct InclusionProofPlugin {
    state: Option<Arc<GatewayState>>,
}

impl Plugin for InclusionProofPlugin {
    fn name(&self) -> &'static str {
        "inclusion_proof"
    }

    fn mount(&mut self) -> Result<(), PluginError> {
        let config =
            GatewayConfig::from_env().map_err(|e| PluginError::InitError(e.to_string()))?;

        let http = reqwest::Client::new();
        let revocation: Arc<dyn RevocationStore> = Arc::new(GraphQlRevocationStore::new(
            config.graphql_endpoint.clone(),
            http.clone(),
        ));

        self.state = Some(Arc::new(GatewayState {
            config,
            http,
            revocation,
        }));

        Ok(())
    }

    fn unmount(&self) -> Result<(), PluginError> {
        Ok(())
    }

    fn routes(&self) -> Result<Router, PluginError> {
        let state = self
            .state
            .clone()
            .ok_or_else(|| PluginError::InitError("inclusion_proof plugin not mounted".to_owned()))?;

        Ok(web::routes(state))
    }
}
