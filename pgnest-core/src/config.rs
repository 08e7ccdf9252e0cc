use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{Error, models::Identity};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means any
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Snapshot directory; the store stays in memory when unset
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Periodic flush interval, 0 disables
    #[serde(default = "default_flush_interval", with = "duration_ms")]
    pub flush_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            flush_interval: default_flush_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_chat_result_limit")]
    pub result_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            result_limit: default_chat_result_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_per_page")]
    pub default_per_page: usize,

    #[serde(default = "default_max_per_page")]
    pub max_per_page: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

impl SearchConfig {
    pub fn per_page(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_per_page)
            .clamp(1, self.max_per_page.max(1))
    }
}

/// Identity-provider tokens and bootstrap admins. Kept out of [`AppConfig`]
/// so it can live in its own file.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecretConfig {
    /// Bearer token → identity it stands for
    #[serde(default)]
    pub tokens: HashMap<String, TokenEntry>,

    /// Subjects promoted to admin at startup
    #[serde(default)]
    pub bootstrap_admins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenEntry {
    pub subject: String,
    pub email: String,
    pub name: String,
}

impl From<&TokenEntry> for Identity {
    fn from(entry: &TokenEntry) -> Self {
        Identity {
            subject: entry.subject.clone(),
            email: entry.email.clone(),
            name: entry.name.clone(),
        }
    }
}

impl SecretConfig {
    /// Token list with the secrets wrapped.
    pub fn token_pairs(&self) -> Vec<(SecretString, Identity)> {
        self.tokens
            .iter()
            .map(|(token, entry)| {
                (
                    SecretString::new(Box::from(token.as_str())),
                    Identity::from(entry),
                )
            })
            .collect()
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> Result<T, Error> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| Error::Config(format!("Failed to open {}: {}", path.display(), e)))?;
    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, Error> {
    serde_json::from_str(s).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_flush_interval() -> Duration {
    Duration::from_millis(30_000)
}
fn default_chat_result_limit() -> usize {
    5
}
fn default_per_page() -> usize {
    20
}
fn default_max_per_page() -> usize {
    100
}

pub mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
