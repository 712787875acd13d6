//! Configuration module for the showcase backend.
//!
//! Only the listening port is read from the environment; everything else is
//! a fixed default kept here so tests can override it.

use std::env;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4173;
pub const DEFAULT_DATA_PATH: &str = "./storage/projects.json";
pub const DEFAULT_PUBLIC_DIR: &str = "./public";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Path to the project document
    pub data_path: PathBuf,
    /// Directory served for non-API paths
    pub public_dir: PathBuf,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
    /// A PORT value that was set but unusable
    pub ignored_port: Option<String>,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let (port, ignored_port) = match parse_port(env::var("PORT").ok().as_deref()) {
            Ok(port) => (port, None),
            Err(raw) => (DEFAULT_PORT, Some(raw)),
        };

        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            data_path: DEFAULT_DATA_PATH.into(),
            public_dir: DEFAULT_PUBLIC_DIR.into(),
            log_level: "info".to_string(),
            ignored_port,
        }
    }
}

/// Parse a port value. Unset or blank means [`DEFAULT_PORT`]; anything
/// else that is not a non-zero `u16` is handed back as the error.
pub fn parse_port(raw: Option<&str>) -> Result<u16, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => match value.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(value.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(None), Ok(DEFAULT_PORT));
        assert_eq!(parse_port(Some("")), Ok(DEFAULT_PORT));
        assert_eq!(parse_port(Some("8080")), Ok(8080));
        assert_eq!(parse_port(Some(" 9000 ")), Ok(9000));
        assert_eq!(parse_port(Some("not-a-port")), Err("not-a-port".to_string()));
        assert_eq!(parse_port(Some("70000")), Err("70000".to_string()));
        assert_eq!(parse_port(Some("0")), Err("0".to_string()));
    }

    #[test]
    fn test_default_paths() {
        let config = Config::from_env();
        assert_eq!(config.data_path, PathBuf::from("./storage/projects.json"));
        assert_eq!(config.public_dir, PathBuf::from("./public"));
        assert_eq!(config.log_level, "info");
    }
}
