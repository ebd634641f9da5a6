use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::timestamp::StoreTimestamp;

/// Candidacy status. Flat: any status may be assigned from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Pendente,
    Visualizada,
    Aceita,
    Rejeitada,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pendente,
        ApplicationStatus::Visualizada,
        ApplicationStatus::Aceita,
        ApplicationStatus::Rejeitada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pendente => "Pendente",
            ApplicationStatus::Visualizada => "Visualizada",
            ApplicationStatus::Aceita => "Aceita",
            ApplicationStatus::Rejeitada => "Rejeitada",
        }
    }

    /// Label of the action button that assigns this status.
    pub fn action_label(&self) -> &'static str {
        match self {
            ApplicationStatus::Pendente => "Pendente",
            ApplicationStatus::Visualizada => "Visualizada",
            ApplicationStatus::Aceita => "Aceitar",
            ApplicationStatus::Rejeitada => "Rejeitar",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown application status '{}'", s))
    }
}

/// One candidacy: links an applicant account to a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applied_at: Option<StoreTimestamp>,
}

// A null or empty stored status reads as Pendente; anything else must be a
// known status.
fn status_or_pending<'de, D>(deserializer: D) -> Result<ApplicationStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(ApplicationStatus::Pendente),
        Some(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
