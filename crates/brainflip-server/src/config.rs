use serde::Deserialize;

use brainflip_core::ScoreStore;

/// Config file read from the working directory when present.
pub const CONFIG_FILE: &str = "brainflip.toml";

/// Top-level server configuration, loaded from `brainflip.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub web_root: String,
    pub storage: StorageConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            web_root: "public".to_string(),
            storage: StorageConfig::default(),
        }
    }
}

/// Where the score file lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: String,
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: "storage".to_string(),
            file_name: brainflip_core::store::DEFAULT_SCORES_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidListenAddr(String),
    EmptyStorageFileName,
    NestedStorageFileName(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidListenAddr(addr) => {
                write!(f, "listen_addr {addr:?} is not a valid socket address")
            },
            Self::EmptyStorageFileName => f.write_str("storage.file_name must not be empty"),
            Self::NestedStorageFileName(name) => {
                write!(f, "storage.file_name {name:?} must be a bare file name")
            },
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::InvalidListenAddr(self.listen_addr.clone()));
        }
        if self.storage.file_name.trim().is_empty() {
            return Err(ConfigError::EmptyStorageFileName);
        }
        if self.storage.file_name.contains(['/', '\\']) {
            return Err(ConfigError::NestedStorageFileName(
                self.storage.file_name.clone(),
            ));
        }
        Ok(())
    }

    /// Load config from `brainflip.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(content) => match toml::from_str::<ServerConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {CONFIG_FILE}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {CONFIG_FILE}: {e}, using defaults");
                    ServerConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {CONFIG_FILE} found, using defaults");
                ServerConfig::default()
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from `lookup` (the process environment in production).
    ///
    /// `PORT` is applied last and only replaces the port of `listen_addr`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(addr) = non_empty("BRAINFLIP_LISTEN_ADDR") {
            self.listen_addr = addr;
        }
        if let Some(root) = non_empty("BRAINFLIP_WEB_ROOT") {
            self.web_root = root;
        }
        if let Some(dir) = non_empty("BRAINFLIP_STORAGE_DIR") {
            self.storage.dir = dir;
        }
        if let Some(val) = non_empty("PORT") {
            match val.parse::<u16>() {
                Ok(port) => self.set_port(port),
                Err(_) => tracing::warn!(value = %val, "Ignoring invalid PORT"),
            }
        }
    }

    fn set_port(&mut self, port: u16) {
        let host = match self.listen_addr.rsplit_once(':') {
            Some((host, _)) => host,
            None => self.listen_addr.as_str(),
        };
        self.listen_addr = format!("{host}:{port}");
    }

    /// Score store for the configured storage location.
    pub fn score_store(&self) -> ScoreStore {
        ScoreStore::with_file_name(&self.storage.dir, &self.storage.file_name)
    }
}
