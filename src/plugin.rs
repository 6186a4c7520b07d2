use axum::Router;
use thiserror::Error;

/// Errors raised by plugins during lifecycle transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("{0}")]
    InitError(String),
}

pub trait Plugin: Send + Sync {
    /// Define a unique identifier
    fn name(&self) -> &'static str;

    /// Provide initialization actions as needed
    fn mount(&mut self) -> Result<(), PluginError>;

    /// Revert initialization actions as needed
    fn unmount(&self) -> Result<(), PluginError>;

    /// Export managed endpoints
    fn routes(&self) -> Result<Router, PluginError>;
}
