//! Server configuration.
//!
//! The server takes no flags or environment variables; the binary runs with
//! [`ServerConfig::default`]. The builder exists for embedding and tests.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Port the registration form is served on.
pub const DEFAULT_PORT: u16 = 3000;
/// SQLite file holding registrations, relative to the working directory.
pub const DEFAULT_DB_FILE_NAME: &str = "yoga.db";
const DEFAULT_LOG_DIR_NAME: &str = "logs";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Registration database file; created on first start.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rotated log files.
    pub log_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: yoga_core::default_log_level().to_string(),
            log_dir: default_log_dir(),
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for [`ServerConfig`]; unset fields keep their defaults.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    db_path: Option<PathBuf>,
    log_level: Option<String>,
    log_dir: Option<PathBuf>,
}

impl ServerConfigBuilder {
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            db_path: self.db_path.unwrap_or(defaults.db_path),
            log_level: self.log_level.unwrap_or(defaults.log_level),
            log_dir: self.log_dir.unwrap_or(defaults.log_dir),
        }
    }
}

fn default_log_dir() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::env::temp_dir())
        .join(DEFAULT_LOG_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::{ServerConfig, DEFAULT_DB_FILE_NAME, DEFAULT_PORT};
    use std::net::SocketAddr;
    use std::path::PathBuf;

    #[test]
    fn default_listens_on_fixed_local_port() {
        let config = ServerConfig::default();
        assert_eq!(config.addr.port(), DEFAULT_PORT);
        assert!(config.addr.ip().is_loopback());
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert!(config.log_dir.is_absolute());
    }

    #[test]
    fn builder_overrides_only_given_fields() {
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let config = ServerConfig::builder()
            .addr(addr)
            .db_path("/tmp/other.db")
            .build();

        assert_eq!(config.addr, addr);
        assert_eq!(config.db_path, PathBuf::from("/tmp/other.db"));
        assert_eq!(config.log_level, ServerConfig::default().log_level);
    }
}
