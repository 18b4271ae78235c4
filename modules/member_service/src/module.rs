//! Module wiring: storage, domain service, native client and REST router

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::MemberApi;
use crate::domain::Service;
use crate::infra::storage::MemoryStore;
use axum::Router;
use std::sync::Arc;

/// Member service module
#[derive(Clone)]
pub struct MemberServiceModule {
    config: Arc<Config>,
    store: MemoryStore,
    service: Arc<Service>,
}

impl Default for MemberServiceModule {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl MemberServiceModule {
    /// Build the in-memory store and the domain service on top of it
    pub fn new(config: Config) -> Self {
        let store = MemoryStore::new(config.auditing(), config.cache_capacity());
        let service = Arc::new(Service::new(
            Arc::new(store.member_repository()),
            Arc::new(store.team_repository()),
        ));

        tracing::info!(
            default_page_size = config.default_page_size,
            max_page_size = config.max_page_size,
            cache_capacity = config.cache_capacity(),
            "Member service initialized"
        );

        Self {
            config: Arc::new(config),
            store,
            service,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Backing tables, for inspection of versions and cache statistics
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Native client for in-process callers
    pub fn client(&self) -> Arc<dyn MemberApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// Router with every member service endpoint registered
    pub fn router(&self) -> Router {
        tracing::info!("Registering member service REST routes");
        crate::api::rest::routes::register_routes(
            Router::new(),
            self.service.clone(),
            self.config.clone(),
        )
    }
}
