use serde::{Deserialize, Serialize};

use crate::services::profile_links::SocialNetwork;

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileLinkQuery {
    pub network: String,
    #[serde(default)]
    pub handle: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileLinkResponse {
    pub network: SocialNetwork,
    pub input: String,
    pub url: String,
}
