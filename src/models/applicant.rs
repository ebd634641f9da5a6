use serde::{Deserialize, Serialize};

use super::job::text;

/// Applicant account profile from the accounts collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: String,
    #[serde(rename = "name_conta", alias = "displayName", default, deserialize_with = "text")]
    pub display_name: String,
    #[serde(default, deserialize_with = "text")]
    pub email: String,
    #[serde(rename = "telefone", alias = "phone", default, deserialize_with = "text")]
    pub phone: String,
    #[serde(rename = "desc_sobre", alias = "bio", default)]
    pub bio: Option<String>,
    #[serde(rename = "endereco", alias = "address", default)]
    pub address: Option<String>,
    #[serde(flatten)]
    pub social_handles: SocialHandles,
}

/// Raw, user-entered handles or URLs. Resolve them with
/// `services::profile_links` before use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialHandles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

impl SocialHandles {
    pub fn instagram(&self) -> Option<&str> {
        non_blank(self.instagram.as_deref())
    }

    pub fn linkedin(&self) -> Option<&str> {
        non_blank(self.linkedin.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
