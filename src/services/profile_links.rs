use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::models::Applicant;

const INSTAGRAM_BASE: &str = "https://www.instagram.com/";
const LINKEDIN_BASE: &str = "https://www.linkedin.com/in/";
const LINKEDIN_PREFIXES: [&str; 2] = ["http://www.linkedin.com/in/", "https://www.linkedin.com/in/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialNetwork {
    Instagram,
    Linkedin,
}

impl SocialNetwork {
    pub fn label(&self) -> &'static str {
        match self {
            SocialNetwork::Instagram => "Instagram",
            SocialNetwork::Linkedin => "LinkedIn",
        }
    }

    pub fn resolve(&self, raw: &str) -> String {
        match self {
            SocialNetwork::Instagram => instagram_url(raw),
            SocialNetwork::Linkedin => linkedin_url(raw),
        }
    }
}

impl fmt::Display for SocialNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SocialNetwork {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instagram" => Ok(SocialNetwork::Instagram),
            "linkedin" => Ok(SocialNetwork::Linkedin),
            other => Err(format!("unsupported social network '{}'", other)),
        }
    }
}

/// `@handle`, `handle` or a full URL to an Instagram profile URL.
pub fn instagram_url(raw: &str) -> String {
    let clean = raw.trim();
    let clean = clean.strip_prefix('@').unwrap_or(clean);
    if clean.starts_with("http") {
        clean.to_string()
    } else {
        format!("{}{}", INSTAGRAM_BASE, clean)
    }
}

/// Profile slug or full `/in/` URL to a LinkedIn profile URL.
pub fn linkedin_url(raw: &str) -> String {
    let clean = raw.trim();
    if LINKEDIN_PREFIXES.iter().any(|p| clean.starts_with(p)) {
        clean.to_string()
    } else {
        format!("{}{}", LINKEDIN_BASE, clean)
    }
}

/// Decides whether the platform can open a URL.
pub trait LinkOpener: Send + Sync {
    fn can_open(&self, url: &str) -> bool;
}

/// Accepts web URLs with a host and `mailto:`/`tel:` links with a target.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlLinkOpener;

impl LinkOpener for UrlLinkOpener {
    fn can_open(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        match parsed.scheme() {
            "http" | "https" => parsed.host_str().map_or(false, |h| !h.is_empty()),
            "mailto" | "tel" => !parsed.path().trim().is_empty(),
            _ => false,
        }
    }
}

/// Resolves a raw handle and checks the result can be opened. The error
/// names the input as the user typed it, not the resolved URL.
pub fn open_profile_link(
    opener: &dyn LinkOpener,
    network: SocialNetwork,
    raw: &str,
) -> Result<String> {
    let url = network.resolve(raw);
    if opener.can_open(&url) {
        Ok(url)
    } else {
        tracing::warn!(network = %network, input = raw, url = %url, "profile link cannot be opened");
        Err(Error::LinkUnavailable {
            network: network.label().to_string(),
            input: raw.to_string(),
        })
    }
}

/// Links offered on the applicant section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactLinks {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
    pub linkedin: Option<String>,
}

/// Builds every link the applicant has data for. Social links that cannot
/// be opened are left out rather than failing the whole section.
pub fn contact_links(opener: &dyn LinkOpener, applicant: &Applicant) -> ContactLinks {
    let email = non_empty(&applicant.email).map(|e| format!("mailto:{}", e));
    let phone = non_empty(&applicant.phone).map(|p| format!("tel:{}", p));
    let handles = &applicant.social_handles;

    ContactLinks {
        email: email.filter(|u| opener.can_open(u)),
        phone: phone.filter(|u| opener.can_open(u)),
        instagram: handles
            .instagram()
            .and_then(|raw| open_profile_link(opener, SocialNetwork::Instagram, raw).ok()),
        linkedin: handles
            .linkedin()
            .and_then(|raw| open_profile_link(opener, SocialNetwork::Linkedin, raw).ok()),
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
