use std::collections::{HashMap, HashSet};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// HTTP server bind settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Speech-to-text provider settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// Provider API base, e.g. "https://api.rev.ai/speechtotext/v1".
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    /// Bearer credential. Empty means not configured.
    #[serde(default)]
    pub api_key: String,
    /// Public URL the provider pushes completion callbacks to.
    #[serde(default)]
    pub callback_url: Option<String>,
    /// Seconds between status polls in synchronous-wait mode.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Ceiling in seconds for synchronous-wait mode.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,
}

/// Column pair a question's results are written into.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionColumns {
    /// Column letter receiving the media URL, e.g. "O".
    pub link_column: String,
    /// Column letter receiving the enhanced transcript, e.g. "P".
    pub transcript_column: String,
}

/// Spreadsheet result-store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Values API base, e.g. "https://sheets.googleapis.com/v4".
    #[serde(default = "default_store_base_url")]
    pub base_url: String,
    /// Bearer credential for the values API.
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,
    /// Column letter holding contact emails.
    #[serde(default = "default_email_column")]
    pub email_column: String,
    /// Question label -> destination columns.
    #[serde(default)]
    pub question_columns: HashMap<String, QuestionColumns>,
}

/// Media intake settings.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaSettings {
    /// Lowercase file extensions accepted for transcription.
    #[serde(default = "default_supported_formats")]
    pub supported_formats: HashSet<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub media: MediaSettings,
}

impl Settings {
    /// Loads layered configuration: `config/default.*`, then
    /// `config/{VOXFORM_ENV}.*`, then `VOXFORM__`-prefixed environment
    /// variables (e.g. `VOXFORM__PROVIDER__API_KEY`).
    pub fn load() -> Result<Self, ConfigError> {
        let run_env = std::env::var("VOXFORM_ENV").unwrap_or_else(|_| "development".to_string());

        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_env}")).required(false))
            .add_source(Environment::with_prefix("VOXFORM").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            api_key: String::new(),
            callback_url: None,
            poll_interval_secs: default_poll_interval_secs(),
            max_wait_secs: default_max_wait_secs(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: default_store_base_url(),
            api_token: String::new(),
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            email_column: default_email_column(),
            question_columns: HashMap::new(),
        }
    }
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            supported_formats: default_supported_formats(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            provider: ProviderSettings::default(),
            store: StoreSettings::default(),
            media: MediaSettings::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_provider_base_url() -> String {
    "https://api.rev.ai/speechtotext/v1".to_string()
}

fn default_store_base_url() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_sheet_name() -> String {
    "Sheet1".to_string()
}

fn default_email_column() -> String {
    "E".to_string()
}

fn default_poll_interval_secs() -> u64 {
    10
}

fn default_max_wait_secs() -> u64 {
    300
}

fn default_supported_formats() -> HashSet<String> {
    ["mp3", "mp4", "ogg", "wav", "pcm", "flac", "aac", "m4a", "wma", "aiff"]
        .into_iter()
        .map(str::to_string)
        .collect()
}
