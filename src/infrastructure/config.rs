use crate::domain::error::IterableError;
use crate::domain::value_objects::{ApiKey, BaseUrl};

pub const DEFAULT_BASE_URL: &str = "https://api.iterable.com/api/";
pub const API_KEY_ENV: &str = "ITERABLE_API_KEY";
pub const BASE_URL_ENV: &str = "ITERABLE_BASE_URL";

/// Settings shared by every command, resolved once from the parsed
/// arguments (clap has already applied the environment fallbacks).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: ApiKey,
    pub base_url: BaseUrl,
}

impl Config {
    pub fn new(api_key: Option<&str>, base_url: &str) -> Result<Self, IterableError> {
        let api_key = match api_key {
            Some(key) if !key.trim().is_empty() => ApiKey::new(key)?,
            _ => {
                return Err(IterableError::usage(format!(
                    "an API key is required: pass --api-key or set {API_KEY_ENV}"
                )));
            }
        };
        Ok(Self {
            api_key,
            base_url: BaseUrl::new(base_url)?,
        })
    }
}
