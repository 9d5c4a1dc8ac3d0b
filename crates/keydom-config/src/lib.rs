//! Shared configuration for keydom-api consumers.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext), and
//! translation to a [`SessionConfig`] that [`connect`] turns into a ready
//! [`AuthSession`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use keydom_api::{AuthSession, Credentials, TlsMode, TransportConfig};

const KEYRING_SERVICE: &str = "keydom";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] keydom_api::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://keydom.example.com/api").
    pub base_url: String,

    /// Login username.
    pub username: Option<String>,

    /// Password (plaintext — prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Previously issued access token; when present, login is skipped.
    pub token: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "keydom", "keydom").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("keydom");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from a specific file, layered under `KEYDOM_` env vars.
///
/// A missing file is not an error: defaults apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("KEYDOM_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`, creating parent dirs.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile selection ───────────────────────────────────────────────

/// Pick a profile by explicit name, falling back to `default_profile`.
pub fn active_profile<'a>(
    cfg: &'a Config,
    name: Option<&'a str>,
) -> Result<(&'a str, &'a Profile), ConfigError> {
    let name = name
        .or(cfg.default_profile.as_deref())
        .unwrap_or("default");

    cfg.profiles
        .get(name)
        .map(|profile| (name, profile))
        .ok_or_else(|| ConfigError::Validation {
            field: "profile".into(),
            reason: format!("no profile named '{name}'"),
        })
}

// ── Credential resolution ───────────────────────────────────────────

/// Name/value lookup used for environment variables and keyring entries.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.get_password())
        .ok()
}

/// Resolve the password: profile's `password_env` → `KEYDOM_PASSWORD` →
/// system keyring → plaintext in config.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    password_from(profile, profile_name, &env_var, &keyring_password)
}

fn password_from(
    profile: &Profile,
    profile_name: &str,
    env: Lookup<'_>,
    keyring: Lookup<'_>,
) -> Result<SecretString, ConfigError> {
    profile
        .password_env
        .as_deref()
        .and_then(env)
        .or_else(|| env("KEYDOM_PASSWORD"))
        .or_else(|| keyring(profile_name))
        .or_else(|| profile.password.clone())
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve username + password for the login exchange.
///
/// The username comes from the profile, then `KEYDOM_USERNAME`.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<Credentials, ConfigError> {
    credentials_from(profile, profile_name, &env_var, &keyring_password)
}

fn credentials_from(
    profile: &Profile,
    profile_name: &str,
    env: Lookup<'_>,
    keyring: Lookup<'_>,
) -> Result<Credentials, ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| env("KEYDOM_USERNAME"))
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let password = password_from(profile, profile_name, env, keyring)?;
    Ok(Credentials::new(username, password))
}

/// A stored token from `KEYDOM_TOKEN` or the profile, if any.
pub fn resolve_token(profile: &Profile) -> Option<SecretString> {
    token_from(profile, &env_var)
}

fn token_from(profile: &Profile, env: Lookup<'_>) -> Option<SecretString> {
    env("KEYDOM_TOKEN")
        .or_else(|| profile.token.clone())
        .filter(|t| !t.is_empty())
        .map(SecretString::from)
}

// ── Session config ──────────────────────────────────────────────────

/// How a session obtains its token.
#[derive(Debug, Clone)]
pub enum SessionAuth {
    /// Resume with a previously issued token.
    Token(SecretString),
    /// Log in with username and password.
    Credentials(Credentials),
}

/// Everything needed to open a session. Never touches disk.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub base_url: String,
    pub transport: TransportConfig,
    pub auth: SessionAuth,
}

/// Build a `SessionConfig` from a profile and the global defaults.
pub fn profile_to_session_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<SessionConfig, ConfigError> {
    session_config_from(profile, profile_name, defaults, &env_var, &keyring_password)
}

fn session_config_from(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    env: Lookup<'_>,
    keyring: Lookup<'_>,
) -> Result<SessionConfig, ConfigError> {
    url::Url::parse(&profile.base_url).map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {}", profile.base_url),
    })?;

    let auth = match token_from(profile, env) {
        Some(token) => SessionAuth::Token(token),
        None => SessionAuth::Credentials(credentials_from(profile, profile_name, env, keyring)?),
    };

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));

    Ok(SessionConfig {
        base_url: profile.base_url.clone(),
        transport: TransportConfig { tls, timeout },
        auth,
    })
}

/// Open a session: build the HTTP client, then install the stored token or log in.
pub async fn connect(config: &SessionConfig) -> Result<AuthSession, ConfigError> {
    let session = AuthSession::new(&config.base_url, &config.transport)?;

    match &config.auth {
        SessionAuth::Token(token) => {
            debug!("resuming session with stored token");
            session.set_token(token.clone());
        }
        SessionAuth::Credentials(credentials) => {
            session.login_with(credentials).await?;
        }
    }

    Ok(session)
}
