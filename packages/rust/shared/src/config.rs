//! Application configuration for CourseGen.
//!
//! User config lives at `~/.coursegen/coursegen.toml`.
//! CLI flags override config file values, which override defaults.
//! API keys are never stored in the file; it only names the env vars holding them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CourseGenError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "coursegen.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".coursegen";

// ---------------------------------------------------------------------------
// Config structs (matching coursegen.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Text generation service settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Video search service settings.
    #[serde(default)]
    pub youtube: YouTubeConfig,

    /// Topic validation rules.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Pipeline-wide limits.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// HTTP front end.
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[openai]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Name of the env var holding the API key.
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,

    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model ID used for course generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Upper bound on generated tokens.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout in seconds.
    #[serde(default = "default_openai_timeout")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_key_env(),
            base_url: default_openai_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_openai_timeout(),
        }
    }
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-3.5-turbo".into()
}
fn default_max_tokens() -> u32 {
    4000
}
fn default_temperature() -> f32 {
    0.7
}
fn default_openai_timeout() -> u64 {
    120
}

impl OpenAiConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[youtube]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// Name of the env var holding the API key. Unset means video search is disabled.
    #[serde(default = "default_youtube_key_env")]
    pub api_key_env: String,

    /// Base URL of the YouTube Data API.
    #[serde(default = "default_youtube_base_url")]
    pub base_url: String,

    /// Results requested per module. Clamped to 1..=2 by the search client.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_youtube_timeout")]
    pub timeout_secs: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_youtube_key_env(),
            base_url: default_youtube_base_url(),
            max_results: default_max_results(),
            timeout_secs: default_youtube_timeout(),
        }
    }
}

fn default_youtube_key_env() -> String {
    "YT_API_KEY".into()
}
fn default_youtube_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".into()
}
fn default_max_results() -> u32 {
    2
}
fn default_youtube_timeout() -> u64 {
    10
}

impl YouTubeConfig {
    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[validation]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Minimum topic length in characters (after trimming).
    #[serde(default = "default_min_topic_len")]
    pub min_topic_len: usize,

    /// Maximum topic length in characters (after trimming).
    #[serde(default = "default_max_topic_len")]
    pub max_topic_len: usize,

    /// Terms that may not appear as a word in a topic (case-insensitive).
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_topic_len: default_min_topic_len(),
            max_topic_len: default_max_topic_len(),
            denylist: default_denylist(),
        }
    }
}

fn default_min_topic_len() -> usize {
    3
}
fn default_max_topic_len() -> usize {
    200
}
fn default_denylist() -> Vec<String> {
    ["malware", "ransomware", "phishing", "explosives"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Total latency budget for one course build, in seconds.
    #[serde(default = "default_pipeline_timeout")]
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_pipeline_timeout(),
        }
    }
}

fn default_pipeline_timeout() -> u64 {
    180
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served for static assets (CSS, images).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    3000
}
fn default_static_dir() -> String {
    "public".into()
}

// ---------------------------------------------------------------------------
// Credentials (runtime, resolved once at startup)
// ---------------------------------------------------------------------------

/// API keys resolved from the environment at process start.
///
/// Passed by reference into the generator and video search clients.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Text generation API key (required).
    pub openai_api_key: String,
    /// Video search API key. `None` runs enrichment in degraded mode.
    pub youtube_api_key: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Resolve credentials from the process environment.
pub fn resolve_credentials(config: &AppConfig) -> Result<Credentials> {
    resolve_credentials_with(config, |name| std::env::var(name).ok())
}

/// Resolve credentials through an arbitrary lookup (env, test map, ...).
///
/// Empty values count as unset.
pub fn resolve_credentials_with(
    config: &AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    let var_name = &config.openai.api_key_env;
    let openai_api_key = lookup(var_name)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            CourseGenError::config(format!(
                "OpenAI API key not found. Set the {var_name} environment variable."
            ))
        })?;

    let youtube_api_key = lookup(&config.youtube.api_key_env).filter(|v| !v.is_empty());

    Ok(Credentials {
        openai_api_key,
        youtube_api_key,
    })
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.coursegen/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CourseGenError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.coursegen/coursegen.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| CourseGenError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        CourseGenError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| CourseGenError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| CourseGenError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| CourseGenError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
