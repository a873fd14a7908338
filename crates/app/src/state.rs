//! On-disk application state
//!
//! Everything flatcms persists lives under one directory (`~/.flatcms` unless
//! overridden):
//!
//! ```text
//! ~/.flatcms/
//!   config.toml      listen address, environment, session secret
//!   data/            production documents
//!   users.toml       production credentials
//!   test/
//!     data/          test documents
//!     users.toml     test credentials
//! ```

use std::fmt;
use std::net::SocketAddr;
use std::{fs, path::PathBuf};

use axum_extra::extract::cookie::Key;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "flatcms";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DATA_DIR_NAME: &str = "data";
pub const USERS_FILE_NAME: &str = "users.toml";
pub const TEST_DIR_NAME: &str = "test";
pub const ENV_VAR: &str = "FLATCMS_ENV";

/// Which storage tree the service reads and writes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Test,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Test => write!(f, "test"),
        }
    }
}

/// Configuration stored in config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Listen address for the web server
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Storage tree used when `serve` is not told otherwise
    #[serde(default)]
    pub environment: Environment,
    /// Base64 cookie signing secret (at least 64 bytes once decoded).
    /// When absent a random key is used and sessions end with the process.
    #[serde(default)]
    pub session_secret: Option<String>,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 4567))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            environment: Environment::default(),
            session_secret: None,
        }
    }
}

/// Fresh random secret suitable for [`AppConfig::session_secret`].
pub fn generate_session_secret() -> String {
    STANDARD.encode(Key::generate().master())
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the flatcms directory (~/.flatcms)
    pub root_dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the flatcms directory path (custom or default ~/.flatcms)
    pub fn root_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new state directory with both storage trees
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let root_dir = Self::root_dir(custom_path)?;

        if root_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&root_dir)?;

        let mut config = config.unwrap_or_default();
        if config.session_secret.is_none() {
            config.session_secret = Some(generate_session_secret());
        }

        let state = Self {
            config_path: root_dir.join(CONFIG_FILE_NAME),
            root_dir,
            config,
        };

        for env in [Environment::Production, Environment::Test] {
            fs::create_dir_all(state.data_dir(env))?;
            let users_path = state.users_path(env);
            if !users_path.exists() {
                fs::write(&users_path, "[users]\n")?;
            }
        }

        let config_toml = toml::to_string_pretty(&state.config)?;
        fs::write(&state.config_path, config_toml)?;

        Ok(state)
    }

    /// Load existing state from the flatcms directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let root_dir = Self::root_dir(custom_path)?;

        if !root_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let config_path = root_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            root_dir,
            config_path,
            config,
        })
    }

    fn env_dir(&self, env: Environment) -> PathBuf {
        match env {
            Environment::Production => self.root_dir.clone(),
            Environment::Test => self.root_dir.join(TEST_DIR_NAME),
        }
    }

    /// Document directory for `env`
    pub fn data_dir(&self, env: Environment) -> PathBuf {
        self.env_dir(env).join(DATA_DIR_NAME)
    }

    /// Credential file for `env`
    pub fn users_path(&self, env: Environment) -> PathBuf {
        self.env_dir(env).join(USERS_FILE_NAME)
    }

    /// Cookie signing key built from the configured secret, or a random one.
    pub fn session_key(&self) -> Result<Key, StateError> {
        match &self.config.session_secret {
            Some(secret) => {
                let bytes = STANDARD
                    .decode(secret.trim())
                    .map_err(|e| StateError::InvalidSessionSecret(e.to_string()))?;
                Key::try_from(bytes.as_slice())
                    .map_err(|e| StateError::InvalidSessionSecret(e.to_string()))
            }
            None => {
                tracing::warn!("no session_secret configured; sessions will not survive a restart");
                Ok(Key::generate())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("flatcms directory not initialized. Run 'flatcms init' first")]
    NotInitialized,

    #[error("flatcms directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid session secret: {0}")]
    InvalidSessionSecret(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
