use directories::ProjectDirs;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, ser::SerializeMap};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid credentials file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No home directory found")]
    NoHomeDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where the CLI finds the API and the token to call it with.
///
/// Precedence, highest first: command-line flags, environment (including a
/// `.env` file), then the saved `credentials.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub api_key: SecretString,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(skip)]
    credentials_dir: Option<PathBuf>,
}

impl Serialize for Credentials {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("api_key", self.api_key.expose_secret())?;
        map.serialize_entry("api_url", &self.api_url)?;
        map.end()
    }
}

pub fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            api_key: SecretString::new(Box::default()),
            api_url: default_api_url(),
            credentials_dir: None,
        }
    }
}

/// Mask all but the last four characters of a secret.
pub fn mask_secret(secret: &SecretString) -> String {
    let chars: Vec<char> = secret.expose_secret().chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(12);
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(12), tail)
}

impl Credentials {
    /// Load saved credentials, then apply any non-empty overrides.
    ///
    /// A missing or unreadable credentials file is treated as empty.
    pub fn initialize(
        credentials_dir: Option<PathBuf>,
        url: Option<String>,
        key: Option<String>,
    ) -> Self {
        let mut credentials = Self {
            credentials_dir,
            ..Default::default()
        };
        if let Err(e) = credentials.load() {
            tracing::debug!("No saved credentials loaded: {}", e);
        }

        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            credentials.api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            credentials.api_key = SecretString::new(Box::from(key.trim()));
        }
        credentials
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.expose_secret().is_empty()
    }

    /// `credentials.json` in the given directory, or in the platform config
    /// directory when none was given.
    pub fn file_path(&self) -> ConfigResult<PathBuf> {
        let dir = match &self.credentials_dir {
            Some(dir) => dir.clone(),
            None => ProjectDirs::from("in", "pgnest", "pgnest")
                .ok_or(ConfigError::NoHomeDir)?
                .config_dir()
                .to_path_buf(),
        };
        Ok(dir.join(CREDENTIALS_FILE))
    }

    /// Replace key and URL with the saved ones, if a file exists.
    pub fn load(&mut self) -> ConfigResult<()> {
        let path = self.file_path()?;
        if !path.exists() {
            return Ok(());
        }
        let saved: Credentials = serde_json::from_str(&fs::read_to_string(&path)?)?;
        self.api_key = saved.api_key;
        self.api_url = saved.api_url;
        Ok(())
    }

    pub fn save(&self) -> ConfigResult<PathBuf> {
        let path = self.file_path()?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

fn ensure_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}
