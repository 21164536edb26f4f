use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_DATA_FILE: &str = "assignments.txt";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Process-wide settings, resolved once at startup.
#[derive(Clone)]
pub struct AppConfig {
    pub username: String,
    pub password: String,
    pub secret_key: String,
    pub data_file: PathBuf,
    pub bind_addr: SocketAddr,
}

// Keeps credentials out of log output.
impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .field("data_file", &self.data_file)
            .field("bind_addr", &self.bind_addr)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let username = get("APP_USERNAME").unwrap_or_else(|| DEFAULT_USERNAME.to_string());
        let password = get("APP_PASSWORD").ok_or(ConfigError::Missing("APP_PASSWORD"))?;
        let secret_key = get("SECRET_KEY").ok_or(ConfigError::Missing("SECRET_KEY"))?;
        let data_file = get("HOMEWORK_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let bind_addr = match get("HOMEWORK_HTTP_ADDR") {
            Some(addr) => addr.trim().parse::<SocketAddr>().map_err(|err| ConfigError::Invalid {
                name: "HOMEWORK_HTTP_ADDR",
                message: format!("{err}"),
            })?,
            None => {
                let port = match get("PORT") {
                    Some(port) => port.trim().parse::<u16>().map_err(|err| ConfigError::Invalid {
                        name: "PORT",
                        message: format!("{err}"),
                    })?,
                    None => DEFAULT_PORT,
                };
                SocketAddr::from(([0, 0, 0, 0], port))
            }
        };

        Ok(Self {
            username,
            password,
            secret_key,
            data_file,
            bind_addr,
        })
    }
}
