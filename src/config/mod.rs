//! Configuration management
//!
//! This module handles loading and parsing configuration for the blog backend.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Email / contact form configuration
    #[serde(default)]
    pub email: EmailConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (for cookie-based auth)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

/// Database configuration (SQLite)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database path or connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/inkpost.db".to_string()
}

/// Email configuration for the contact form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// SMTP relay host
    #[serde(default)]
    pub smtp_host: String,
    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address for outgoing mail
    #[serde(default = "default_smtp_from")]
    pub smtp_from: String,
    /// Recipient address for contact form submissions
    #[serde(default = "default_contact_recipient")]
    pub contact_recipient: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            smtp_from: default_smtp_from(),
            contact_recipient: default_contact_recipient(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_from() -> String {
    "inkpost@localhost".to_string()
}

fn default_contact_recipient() -> String {
    "admin@localhost".to_string()
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file.
    ///
    /// If the file doesn't exist, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from file with environment variable overrides.
    ///
    /// Environment variables follow the pattern:
    /// - INKPOST_SERVER_HOST
    /// - INKPOST_SERVER_PORT
    /// - INKPOST_SERVER_CORS_ORIGIN
    /// - INKPOST_DATABASE_URL
    /// - INKPOST_EMAIL_SMTP_HOST
    /// - INKPOST_EMAIL_SMTP_PORT
    /// - INKPOST_EMAIL_SMTP_USERNAME
    /// - INKPOST_EMAIL_SMTP_PASSWORD
    /// - INKPOST_EMAIL_SMTP_FROM
    /// - INKPOST_EMAIL_CONTACT_RECIPIENT
    pub fn load_with_env(path: &std::path::Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to this configuration
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("INKPOST_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("INKPOST_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(origin) = std::env::var("INKPOST_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }
        if let Ok(url) = std::env::var("INKPOST_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(host) = std::env::var("INKPOST_EMAIL_SMTP_HOST") {
            self.email.smtp_host = host;
        }
        if let Ok(port) = std::env::var("INKPOST_EMAIL_SMTP_PORT") {
            if let Ok(port) = port.parse() {
                self.email.smtp_port = port;
            }
        }
        if let Ok(username) = std::env::var("INKPOST_EMAIL_SMTP_USERNAME") {
            self.email.smtp_username = username;
        }
        if let Ok(password) = std::env::var("INKPOST_EMAIL_SMTP_PASSWORD") {
            self.email.smtp_password = password;
        }
        if let Ok(from) = std::env::var("INKPOST_EMAIL_SMTP_FROM") {
            self.email.smtp_from = from;
        }
        if let Ok(recipient) = std::env::var("INKPOST_EMAIL_CONTACT_RECIPIENT") {
            self.email.contact_recipient = recipient;
        }
    }
}
