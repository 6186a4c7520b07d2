pub(crate) mod handler;
pub(crate) mod index;
pub(crate) mod inclusion_proof;

pub use handler::{PluginContainer, PluginContainerError};

use crate::plugin::Plugin;
use lazy_static::lazy_static;
use std::sync::Mutex;

lazy_static! {
    pub(crate) static ref PLUGINS: Mutex<Vec<Box<dyn Plugin>>> = Mutex::new(vec![
        Box::<index::IndexPlugin>::default(),
        Box::<inclusion_proof::InclusionProofPlugin>::default(),
    ]);
}
