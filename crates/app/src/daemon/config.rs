use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum_extra::extract::cookie::Key;

pub struct Config {
    // http server configuration
    /// address the web server binds to
    pub listen_addr: SocketAddr,

    // storage configuration
    /// directory holding one file per document
    pub data_dir: PathBuf,
    /// TOML file mapping usernames to bcrypt hashes
    pub users_path: PathBuf,

    // session configuration
    /// key used to sign the session cookie
    pub session_key: Key,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("data_dir", &self.data_dir)
            .field("users_path", &self.users_path)
            .field("session_key", &"<redacted>")
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}
