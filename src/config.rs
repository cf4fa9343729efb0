use crate::crawlers::web::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::generator::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use crate::output::DEFAULT_RESULTS_DIR;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the LLM API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable overriding the LLM endpoint root
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for one brochure run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Credential for the completion endpoint
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Root of the OpenAI-compatible API
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Token ceiling for the generated brochure
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout for the completion request in seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    /// Timeout for each page fetch in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of subpages fetched besides the main page
    #[serde(default = "default_max_subpages")]
    pub max_subpages: usize,

    /// Root directory for dated result folders
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// User agent sent with page requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_temperature() -> f32 {
    0.7
}

/// Generous, a full brochure can take a while to generate
fn default_llm_timeout_secs() -> u64 {
    600
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_subpages() -> usize {
    5
}

fn default_results_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_DIR)
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            llm_timeout_secs: default_llm_timeout_secs(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            max_subpages: default_max_subpages(),
            results_dir: default_results_dir(),
            user_agent: default_user_agent(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let mut contents = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut contents))
            .map_err(|source| SettingsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json(&contents)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the process environment, after loading a `.env` file if one exists
    pub fn with_env(self) -> Self {
        if let Err(e) = dotenv::dotenv() {
            ::log::debug!("No .env file loaded: {}", e);
        }
        self.with_env_from(|key| std::env::var(key).ok())
    }

    /// Apply environment values from `lookup`; blank values are ignored
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = non_blank(API_KEY_VAR) {
            self.api_key = Some(api_key);
        }
        if let Some(base_url) = non_blank(BASE_URL_VAR) {
            self.api_base_url = base_url;
        }
        self
    }

    /// The API key, if one was configured and is not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }
}
