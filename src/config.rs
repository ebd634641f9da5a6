use crate::error::{Error, Result};
use crate::store::Collections;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Firestore,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "firestore" => Ok(StoreBackend::Firestore),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub firestore_project_id: Option<String>,
    pub firestore_api_key: Option<String>,
    pub firestore_bearer_token: Option<String>,
    pub collections: Collections,
    pub display_utc_offset_minutes: i32,
    pub store_timeout_secs: u64,
    pub public_rps: u32,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = Collections::default();
        let store_backend = get_env_parse_or("STORE_BACKEND", StoreBackend::Postgres)?;
        let database_url = env::var("DATABASE_URL").ok();
        let firestore_project_id = env::var("FIRESTORE_PROJECT_ID").ok();

        match store_backend {
            StoreBackend::Postgres if database_url.is_none() => {
                return Err(Error::Config(
                    "Missing environment variable: DATABASE_URL".to_string(),
                ));
            }
            StoreBackend::Firestore if firestore_project_id.is_none() => {
                return Err(Error::Config(
                    "Missing environment variable: FIRESTORE_PROJECT_ID".to_string(),
                ));
            }
            _ => {}
        }

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            store_backend,
            database_url,
            firestore_project_id,
            firestore_api_key: env::var("FIRESTORE_API_KEY").ok(),
            firestore_bearer_token: env::var("FIRESTORE_BEARER_TOKEN").ok(),
            collections: Collections {
                applications: env::var("APPLICATIONS_COLLECTION")
                    .unwrap_or(defaults.applications),
                jobs: env::var("JOBS_COLLECTION").unwrap_or(defaults.jobs),
                accounts: env::var("ACCOUNTS_COLLECTION").unwrap_or(defaults.accounts),
            },
            display_utc_offset_minutes: get_env_parse_or("DISPLAY_UTC_OFFSET_MINUTES", -180)?,
            store_timeout_secs: get_env_parse_or("STORE_TIMEOUT_SECS", 10)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 50)?,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
