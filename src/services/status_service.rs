use std::sync::Arc;

use serde_json::json;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::models::ApplicationStatus;
use crate::session::DetailSession;
use crate::store::{Collections, DocumentStore, JsonMap, StoreError};

#[derive(Clone)]
pub struct StatusService {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl StatusService {
    pub fn new(store: Arc<dyn DocumentStore>, collections: &Collections) -> Self {
        Self {
            store,
            collection: collections.applications.clone(),
        }
    }

    /// Writes `new_status` for the application loaded in `session` and, once
    /// the store accepts it, shows it locally without re-reading.
    ///
    /// Requires a loaded application and a free busy flag. A failed write
    /// leaves the session exactly as it was. There is no version check, so
    /// the last writer wins.
    pub async fn set_application_status(
        &self,
        session: &DetailSession,
        new_status: ApplicationStatus,
    ) -> Result<ApplicationStatus> {
        let application = session.application().ok_or(Error::NotLoaded)?;
        let _busy = session.try_begin_update().ok_or(Error::Busy)?;
        let previous = session.current_status();

        self.write_status(&application.id, new_status)
            .await
            .map_err(|e| {
                error!(
                    error = %e,
                    application_id = %application.id,
                    status = %new_status,
                    "failed to update application status"
                );
                Error::UpdateFailed(e)
            })?;

        session.commit_status(new_status);
        info!(
            application_id = %application.id,
            from = %previous,
            to = %new_status,
            "application status updated"
        );
        Ok(new_status)
    }

    /// Patches only the `status` field of one application document.
    pub async fn write_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> std::result::Result<(), StoreError> {
        let mut fields = JsonMap::new();
        fields.insert("status".to_string(), json!(status));
        self.store
            .update_fields(&self.collection, application_id, fields)
            .await
    }
}
