use crate::credentials::verifier::{DEFAULT_VERIFIER_TIMEOUT_SECS, DEFAULT_VERIFIER_URL};
use crate::session::manager::DEFAULT_TIMEOUT_SECS;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TokengateSettings {
    pub application: ApplicationSettings,
    pub session: SessionSettings,
    pub verifier: VerifierSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Base64-encoded master secret. Empty means a random secret is
    /// generated at startup, which invalidates all tokens on restart.
    pub secret: String,
    /// Token lifetime in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierSettings {
    /// Remote assertion verifier endpoint
    pub url: String,
    /// Per-request timeout for the remote verifier
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            secret: String::new(), // Random per process if left empty
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_VERIFIER_URL.to_string(),
            timeout_seconds: DEFAULT_VERIFIER_TIMEOUT_SECS,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SessionSettings {
    /// Decode the configured secret
    ///
    /// # Returns
    /// * `Ok(None)` - No secret configured; a random one should be generated
    /// * `Ok(Some(bytes))` - The decoded secret
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is not valid standard base64.
    pub fn secret_bytes(&self) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        let secret = self.secret.trim();
        if secret.is_empty() {
            return Ok(None);
        }
        general_purpose::STANDARD.decode(secret).map(Some)
    }
}

impl TokengateSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Logger initialization fails
    /// - Settings file cannot be read or parsed
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        env_logger::Builder::new()
            .parse_filters(&settings.logging.level)
            .try_init()?;

        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `TOKENGATE_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file cannot be read or parsed
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_file(&default_config_path)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("TOKENGATE_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_file(&secrets_path)?;
                println!("✓ Overriding settings from {}", secrets_path.display());
            } else {
                println!(
                    "ℹ TOKENGATE_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a TOML settings file; missing sections and keys take defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_content = fs::read_to_string(path)?;
        Ok(basic_toml::from_str(&toml_content)?)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        if let Ok(host) = std::env::var("HOST") {
            settings.application.host = host;
        }
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port) = port.parse::<u16>() {
                settings.application.port = port;
            }
        }
        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            if !secret.is_empty() {
                settings.session.secret = secret;
            }
        }
        Self::apply_numeric_env_override(
            "SESSION_TIMEOUT_SECONDS",
            &mut settings.session.timeout_seconds,
        );
        if let Ok(url) = std::env::var("VERIFIER_URL") {
            settings.verifier.url = url;
        }
        Self::apply_numeric_env_override(
            "VERIFIER_TIMEOUT_SECONDS",
            &mut settings.verifier.timeout_seconds,
        );
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            settings.logging.level = log_level;
        }
    }

    /// Helper function to apply numeric environment variable overrides
    fn apply_numeric_env_override(env_var: &str, target: &mut u64) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<u64>() {
                *target = value;
            }
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}
