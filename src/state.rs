//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{RegistrySettings, UrlRegistry};
use crate::domain::repositories::UrlStore;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<UrlRegistry<dyn UrlStore>>,
    /// Prefix for returned short URLs; `None` derives it from the Host header.
    pub base_url: Option<String>,
}

impl AppState {
    pub fn new(store: Arc<dyn UrlStore>, settings: RegistrySettings, base_url: Option<String>) -> Self {
        Self {
            registry: Arc::new(UrlRegistry::new(store, settings)),
            base_url,
        }
    }
}
