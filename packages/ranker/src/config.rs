use std::path::PathBuf;

use memorank_algo::DEFAULT_GROUP_SIZE;

/// Which durable store backs the ranking state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Json,
    Sqlite,
}

impl StoreBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(StoreBackend::Json),
            "sqlite" => Some(StoreBackend::Sqlite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub state_path: PathBuf,
    pub catalog_path: PathBuf,
    pub group_size: usize,
    pub seed: Option<u64>,
    pub log_level: String,
    /// Directory for rolling log files; `None` logs to the console only
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreBackend::Json,
            state_path: PathBuf::from("./memorank-state.json"),
            catalog_path: PathBuf::from("./catalog.json"),
            group_size: DEFAULT_GROUP_SIZE,
            seed: None,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store = lookup("MEMORANK_STORE")
            .and_then(|value| StoreBackend::from_str(&value))
            .unwrap_or(defaults.store);

        let state_path = lookup("MEMORANK_STATE_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.state_path);

        let catalog_path = lookup("MEMORANK_CATALOG_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.catalog_path);

        let group_size = lookup("MEMORANK_GROUP_SIZE")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(defaults.group_size);

        let seed = lookup("MEMORANK_SEED").and_then(|value| value.trim().parse::<u64>().ok());

        let log_level = lookup("RUST_LOG").unwrap_or(defaults.log_level);

        let file_logs = lookup("ENABLE_FILE_LOGS")
            .map(|value| value == "true" || value == "1")
            .unwrap_or(false);
        let log_dir = file_logs.then(|| {
            lookup("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./logs"))
        });

        Self {
            store,
            state_path,
            catalog_path,
            group_size,
            seed,
            log_level,
            log_dir,
        }
    }
}
