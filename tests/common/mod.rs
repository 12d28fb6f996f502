#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{Duration, Utc};
use std::sync::Arc;
use url_registry::api::routes::public_routes;
use url_registry::application::services::RegistrySettings;
use url_registry::domain::entities::{NewUrlRecord, UrlRecord};
use url_registry::domain::repositories::UrlStore;
use url_registry::infrastructure::persistence::MemoryUrlStore;
use url_registry::state::AppState;

pub const TEST_BASE_URL: &str = "http://s.test";

pub fn create_test_state() -> (AppState, Arc<MemoryUrlStore>) {
    create_test_state_with(RegistrySettings::default())
}

pub fn create_test_state_with(settings: RegistrySettings) -> (AppState, Arc<MemoryUrlStore>) {
    let store = Arc::new(MemoryUrlStore::new());
    let state = AppState::new(
        store.clone() as Arc<dyn UrlStore>,
        settings,
        Some(TEST_BASE_URL.to_string()),
    );

    (state, store)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(public_routes().with_state(state)).unwrap()
}

pub async fn create_test_record(
    store: &MemoryUrlStore,
    code: &str,
    url: &str,
    expires_in: Duration,
) -> UrlRecord {
    let now = Utc::now();
    store
        .insert(NewUrlRecord {
            original_url: url.to_string(),
            short_code: code.to_string(),
            expires_at: now + expires_in,
            created_by: "anonymous".to_string(),
            created_at: now,
        })
        .await
        .unwrap()
}
