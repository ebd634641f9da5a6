pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod store;
pub mod utils;

use std::sync::Arc;

use chrono::FixedOffset;

use crate::config::Config;
use crate::services::{
    detail_service::DetailService,
    profile_links::{LinkOpener, UrlLinkOpener},
    session_registry::SessionRegistry,
    status_service::StatusService,
};
use crate::store::{Collections, DocumentStore};

#[derive(Clone)]
pub struct AppState {
    pub detail_service: DetailService,
    pub status_service: StatusService,
    pub sessions: SessionRegistry,
    pub link_opener: Arc<dyn LinkOpener>,
    pub display_offset: FixedOffset,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collections: &Collections,
        display_offset: FixedOffset,
    ) -> Self {
        let detail_service = DetailService::new(store.clone(), collections);
        let status_service = StatusService::new(store, collections);

        Self {
            detail_service,
            status_service,
            sessions: SessionRegistry::new(),
            link_opener: Arc::new(UrlLinkOpener),
            display_offset,
        }
    }

    pub fn from_config(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self::new(
            store,
            &config.collections,
            crate::utils::time::display_offset(config.display_utc_offset_minutes),
        )
    }

    pub fn with_link_opener(mut self, opener: Arc<dyn LinkOpener>) -> Self {
        self.link_opener = opener;
        self
    }
}
