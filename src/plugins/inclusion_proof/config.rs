use super::model::Environment;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("{0} env variable required")]
    MissingVariable(&'static str),
}

/// Credentials and address of one sequencer deployment.
#[derive(Debug, Clone)]
pub(crate) struct SequencerEndpoint {
    pub(crate) base_url: String,
    pub(crate) api_key: String,
}

/// Gateway configuration, resolved once at plugin mount.
///
/// Sequencer endpoints are keyed by [`Environment`] so the request handler
/// resolves its upstream with a single total lookup instead of branching on
/// environment strings.
#[derive(Debug, Clone)]
pub(crate) struct GatewayConfig {
    pub(crate) graphql_endpoint: String,
    pub(crate) staging: SequencerEndpoint,
    pub(crate) production: SequencerEndpoint,
}

impl GatewayConfig {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            graphql_endpoint: require("GRAPHQL_API_URL")?,
            staging: SequencerEndpoint {
                base_url: require("PHONE_SEQUENCER_STAGING_URL")?,
                api_key: require("PHONE_SEQUENCER_STAGING_KEY")?,
            },
            production: SequencerEndpoint {
                base_url: require("PHONE_SEQUENCER_URL")?,
                api_key: require("PHONE_SEQUENCER_KEY")?,
            },
        })
    }

    /// Resolve the sequencer endpoint serving the requested environment.
    pub(crate) fn sequencer(&self, env: Environment) -> &SequencerEndpoint {
        match env {
            Environment::Staging => &self.staging,
            Environment::Production => &self.production,
        }
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVariable(name))
}
