use axum::Router;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use thiserror::Error;

use super::PLUGINS;
use crate::plugin::{Plugin, PluginError};

#[derive(Debug, Error, PartialEq)]
pub enum PluginContainerError {
    #[error("found duplicate entries in plugin registry")]
    DuplicateEntry,
    #[error("plugin container is not loaded")]
    Unloaded,
    #[error("errors while processing plugins: {0:?}")]
    PluginErrorMap(HashMap<String, PluginError>),
}

pub struct PluginContainer<'a> {
    loaded: bool,
    collected_routes: Vec<Router>,
    plugins: &'a Mutex<Vec<Box<dyn Plugin>>>,
}

impl Default for PluginContainer<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginContainer<'_> {
    /// Instantiate an object aware of all statically registered plugins
    pub fn new() -> Self {
        Self {
            loaded: false,
            collected_routes: vec![],
            plugins: &*PLUGINS,
        }
    }

    /// Search registered plugin based on name string
    pub fn find_plugin(&self, name: &str) -> Option<usize> {
        let plugins = self.plugins.lock().unwrap();
        plugins.iter().position(|plugin| name == plugin.name())
    }

    /// Load referenced plugins
    ///
    /// This entails mounting them and merging their routes internally (only
    /// upon successful initialization). An error is returned if plugins
    /// bearing the same name are found. Also, all plugins failing to be
    /// initialized are returned in a map with respectively raised errors.
    pub fn load(&mut self) -> Result<(), PluginContainerError> {
        tracing::debug!("loading plugin container");

        // Obtain lock
        let mut plugins = self.plugins.lock().unwrap();

        // Checking for duplicates
        let mut seen_names = HashSet::new();
        for plugin in plugins.iter() {
            if !seen_names.insert(plugin.name().to_string()) {
                tracing::error!(
                    "found duplicate entry in plugin registry: {}",
                    plugin.name()
                );
                return Err(PluginContainerError::DuplicateEntry);
            }
        }

        // Reset collection of routes
        self.collected_routes.clear();

        // Mount plugins and collect routes on successful status
        let errors: HashMap<_, _> = plugins
            .iter_mut()
            .filter_map(|plugin| {
                let mounted = match plugin.mount() {
                    Ok(_) => plugin.routes(),
                    Err(err) => Err(err),
                };
                match mounted {
                    Ok(routes) => {
                        tracing::info!("mounted plugin {}", plugin.name());
                        self.collected_routes.push(routes);
                        None
                    }
                    Err(err) => {
                        tracing::error!("error mounting plugin {}", plugin.name());
                        Some((plugin.name().to_string(), err))
                    }
                }
            })
            .collect();

        // Flag as loaded
        self.loaded = true;

        // Return state of completion
        if errors.is_empty() {
            tracing::debug!("plugin container loaded");
            Ok(())
        } else {
            Err(PluginContainerError::PluginErrorMap(errors))
        }
    }

    /// Unload container plugins, reverting their initialization actions.
    pub fn unload(&mut self) -> Result<(), PluginContainerError> {
        tracing::debug!("unloading plugin container");

        let plugins = self.plugins.lock().unwrap();

        let errors: HashMap<_, _> = plugins
            .iter()
            .filter_map(|plugin| match plugin.unmount() {
                Ok(_) => {
                    tracing::info!("unmounted plugin {}", plugin.name());
                    None
                }
                Err(err) => {
                    tracing::error!("error unmounting plugin {}", plugin.name());
                    Some((plugin.name().to_string(), err))
                }
            })
            .collect();

        self.loaded = false;
        self.collected_routes.clear();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PluginContainerError::PluginErrorMap(errors))
        }
    }

    /// Merge collected routes from all plugins successfully initialized.
    pub fn routes(&self) -> Result<Router, PluginContainerError> {
        if self.loaded {
            Ok(self
                .collected_routes
                .iter()
                .fold(Router::new(), |acc, e| acc.merge(e.clone())))
        } else {
            Err(PluginContainerError::Unloaded)
        }
    }
}
