use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Applicant, Application, ApplicationStatus, JobPosting};
use crate::services::detail_service::{ApplicationDetail, DetailKey};
use crate::services::profile_links::{contact_links, ContactLinks, LinkOpener};
use crate::session::DetailSession;

pub const JOB_NOT_AVAILABLE: &str = "Informações da vaga não encontradas ou excluídas.";
pub const APPLICANT_NOT_AVAILABLE: &str = "Informações do candidato não encontradas ou excluídas.";
pub const APPLIED_AT_NOT_AVAILABLE: &str = "Data não disponível";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailQuery {
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub applicant_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OpenSessionPayload {
    #[validate(length(min = 1))]
    pub application_id: String,
    #[validate(length(min = 1))]
    pub job_id: String,
    #[validate(length(min = 1))]
    pub applicant_id: String,
}

impl From<OpenSessionPayload> for DetailKey {
    fn from(p: OpenSessionPayload) -> Self {
        DetailKey::new(p.application_id, p.job_id, p.applicant_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: ApplicationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusResponse {
    pub session_id: Uuid,
    pub application_id: String,
    pub status: ApplicationStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationSection {
    pub id: String,
    pub job_id: String,
    pub user_id: String,
    pub company_id: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: Option<DateTime<Utc>>,
    pub applied_at_display: String,
}

impl ApplicationSection {
    fn build(application: &Application, offset: FixedOffset) -> Self {
        Self {
            id: application.id.clone(),
            job_id: application.job_id.clone(),
            user_id: application.user_id.clone(),
            company_id: application.company_id.clone(),
            status: application.status,
            applied_at: application.applied_at.map(|t| t.to_date()),
            applied_at_display: application
                .applied_at
                .map(|t| t.display(offset))
                .unwrap_or_else(|| APPLIED_AT_NOT_AVAILABLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSection {
    pub id: String,
    pub title: String,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub location: String,
    pub work_mode: String,
    pub employment_type: String,
    pub salary: String,
    pub contact_email: String,
}

impl From<&JobPosting> for JobSection {
    fn from(job: &JobPosting) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            description: job.description.clone(),
            location: job.location.clone(),
            work_mode: job.work_mode.clone(),
            employment_type: job.employment_type.clone(),
            salary: job.salary.clone(),
            contact_email: job.contact_email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicantSection {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub phone: String,
    pub bio: Option<String>,
    pub address: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
    pub links: ContactLinks,
}

impl ApplicantSection {
    fn build(applicant: &Applicant, opener: &dyn LinkOpener) -> Self {
        Self {
            id: applicant.id.clone(),
            display_name: applicant.display_name.clone(),
            email: applicant.email.clone(),
            phone: applicant.phone.clone(),
            bio: applicant.bio.clone(),
            address: applicant.address.clone(),
            instagram: applicant.social_handles.instagram.clone(),
            linkedin: applicant.social_handles.linkedin.clone(),
            links: contact_links(opener, applicant),
        }
    }
}

/// Joined view of one application. A missing job or applicant is `null`
/// with a notice to show in that section instead.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationDetailResponse {
    pub application: ApplicationSection,
    pub job: Option<JobSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_notice: Option<String>,
    pub applicant: Option<ApplicantSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_notice: Option<String>,
}

impl ApplicationDetailResponse {
    pub fn build(detail: &ApplicationDetail, offset: FixedOffset, opener: &dyn LinkOpener) -> Self {
        Self {
            application: ApplicationSection::build(&detail.application, offset),
            job: detail.job.as_ref().map(JobSection::from),
            job_notice: detail
                .job
                .is_none()
                .then(|| JOB_NOT_AVAILABLE.to_string()),
            applicant: detail
                .applicant
                .as_ref()
                .map(|a| ApplicantSection::build(a, opener)),
            applicant_notice: detail
                .applicant
                .is_none()
                .then(|| APPLICANT_NOT_AVAILABLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub application_id: String,
    pub current_status: ApplicationStatus,
    pub loaded: bool,
    pub busy: bool,
    pub detail: Option<ApplicationDetailResponse>,
}

impl SessionResponse {
    pub fn build(
        session_id: Uuid,
        session: &DetailSession,
        offset: FixedOffset,
        opener: &dyn LinkOpener,
    ) -> Self {
        let detail = session.detail();
        Self {
            session_id,
            application_id: session.key().application_id.clone(),
            current_status: session.current_status(),
            loaded: detail.is_some(),
            busy: session.is_busy(),
            detail: detail
                .as_ref()
                .map(|d| ApplicationDetailResponse::build(d, offset, opener)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusOption {
    pub value: ApplicationStatus,
    pub action_label: &'static str,
}

impl From<ApplicationStatus> for StatusOption {
    fn from(status: ApplicationStatus) -> Self {
        Self {
            value: status,
            action_label: status.action_label(),
        }
    }
}
