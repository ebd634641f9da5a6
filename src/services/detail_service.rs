use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::{Error, Result};
use crate::models::{Applicant, Application, ApplicationStatus, JobPosting};
use crate::services::record_loader::{ApplicantLoader, ApplicationLoader, JobLoader};
use crate::store::{Collections, DocumentStore};

/// One application joined with its job posting and applicant account.
/// Either related record may be gone without invalidating the application.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationDetail {
    pub application: Application,
    pub job: Option<JobPosting>,
    pub applicant: Option<Applicant>,
}

impl ApplicationDetail {
    pub fn status(&self) -> ApplicationStatus {
        self.application.status
    }
}

/// Identifiers a detail screen is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailKey {
    pub application_id: String,
    pub job_id: String,
    pub applicant_id: String,
}

impl DetailKey {
    pub fn new(
        application_id: impl Into<String>,
        job_id: impl Into<String>,
        applicant_id: impl Into<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            job_id: job_id.into(),
            applicant_id: applicant_id.into(),
        }
    }
}

#[derive(Clone)]
pub struct DetailService {
    applications: ApplicationLoader,
    jobs: JobLoader,
    applicants: ApplicantLoader,
}

impl DetailService {
    pub fn new(store: Arc<dyn DocumentStore>, collections: &Collections) -> Self {
        Self {
            applications: ApplicationLoader::new(store.clone(), collections.applications.clone()),
            jobs: JobLoader::new(store.clone(), collections.jobs.clone()),
            applicants: ApplicantLoader::new(store, collections.accounts.clone()),
        }
    }

    pub async fn load(&self, key: &DetailKey) -> Result<ApplicationDetail> {
        self.load_application_detail(&key.application_id, &key.job_id, &key.applicant_id)
            .await
    }

    /// Loads the application first; when it exists, loads the job posting and
    /// the applicant concurrently. The first transport error aborts the whole
    /// load so a half-joined view is never returned.
    pub async fn load_application_detail(
        &self,
        application_id: &str,
        job_id: &str,
        applicant_id: &str,
    ) -> Result<ApplicationDetail> {
        let missing: Vec<&str> = [
            ("application_id", application_id),
            ("job_id", job_id),
            ("applicant_id", applicant_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect();
        if !missing.is_empty() {
            return Err(Error::InvalidInput(format!(
                "missing application parameters: {}",
                missing.join(", ")
            )));
        }
        let (application_id, job_id, applicant_id) =
            (application_id.trim(), job_id.trim(), applicant_id.trim());

        let application = self
            .applications
            .fetch(application_id)
            .await
            .map_err(|e| {
                error!(error = %e, application_id, "failed to load application");
                Error::FetchFailed(e)
            })?
            .ok_or_else(|| {
                Error::NotFound(format!("application {} does not exist", application_id))
            })?;

        if !application.job_id.is_empty() && application.job_id != job_id {
            warn!(
                application_id,
                stored = %application.job_id,
                requested = job_id,
                "job id differs from the one stored on the application"
            );
        }
        if !application.user_id.is_empty() && application.user_id != applicant_id {
            warn!(
                application_id,
                stored = %application.user_id,
                requested = applicant_id,
                "applicant id differs from the one stored on the application"
            );
        }

        let (job, applicant) =
            tokio::try_join!(self.jobs.fetch(job_id), self.applicants.fetch(applicant_id))
                .map_err(|e| {
                    error!(error = %e, application_id, "failed to load application relations");
                    Error::FetchFailed(e)
                })?;

        if job.is_none() {
            warn!(job_id, application_id, "job posting not found");
        }
        if applicant.is_none() {
            warn!(applicant_id, application_id, "applicant account not found");
        }

        info!(
            application_id,
            status = %application.status,
            has_job = job.is_some(),
            has_applicant = applicant.is_some(),
            "application detail loaded"
        );

        Ok(ApplicationDetail {
            application,
            job,
            applicant,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryDocumentStore;
    use serde_json::json;

    fn service(store: Arc<MemoryDocumentStore>) -> DetailService {
        DetailService::new(store, &Collections::default())
    }

    #[tokio::test]
    async fn blank_identifiers_are_rejected_before_any_read() {
        let store = Arc::new(MemoryDocumentStore::new());
        let svc = service(store.clone());

        let err = svc.load_application_detail("A1", " ", "").await.unwrap_err();
        match err {
            Error::InvalidInput(msg) => {
                assert!(msg.contains("job_id"));
                assert!(msg.contains("applicant_id"));
                assert!(!msg.contains("application_id"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.read_count(), 0);
    }

    #[tokio::test]
    async fn missing_application_short_circuits() {
        let store = Arc::new(MemoryDocumentStore::new());
        store.insert("jobPostings", "J1", json!({ "nome_vaga": "Dev" }));
        let svc = service(store.clone());

        let err = svc.load_application_detail("A1", "J1", "U1").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(store.read_count(), 1);
    }
}
