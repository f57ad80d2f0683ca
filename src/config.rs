use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MemdexError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub audit: AuditConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            search: SearchConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration: defaults, then the config file (explicit path,
    /// `MEMDEX_CONFIG`, or `<root>/config.toml`), then env overrides.
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("MEMDEX_CONFIG").ok().map(Into::into));

        let path = explicit.unwrap_or_else(|| root.join("config.toml"));
        if let Some(patch) = Self::load_patch(&path)? {
            config.merge_patch(patch);
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| MemdexError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| MemdexError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.index {
            self.index.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.audit {
            self.audit.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_bool("MEMDEX_INDEX_ENABLED") {
            self.index.enabled = value;
        }
        if let Some(value) = env_string("MEMDEX_INDEX_DIR") {
            self.index.dir = value;
        }
        if let Some(value) = env_u32("MEMDEX_INDEX_WRITER_HEAP_MB")? {
            self.index.writer_heap_mb = value;
        }

        if let Some(value) = env_usize("MEMDEX_SEARCH_DEFAULT_PAGE_SIZE")? {
            self.search.default_page_size = value;
        }
        if let Some(value) = env_usize("MEMDEX_SEARCH_MAX_PAGE_SIZE")? {
            self.search.max_page_size = value;
        }

        if let Some(value) = env_string("MEMDEX_AUDIT_ACTOR") {
            self.audit.actor = value;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.search.default_page_size == 0 {
            return Err(MemdexError::Config(
                "search.default_page_size must be at least 1".to_string(),
            ));
        }
        if self.search.max_page_size < self.search.default_page_size {
            return Err(MemdexError::Config(
                "search.max_page_size must not be below search.default_page_size".to_string(),
            ));
        }
        // The index writer splits its budget across worker threads, each of
        // which needs a few megabytes of arena to itself.
        if self.index.writer_heap_mb < 32 {
            return Err(MemdexError::Config(
                "index.writer_heap_mb must be at least 32".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Index directory, relative to the memdex root.
    #[serde(default)]
    pub dir: String,
    #[serde(default)]
    pub writer_heap_mb: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: "index".to_string(),
            writer_heap_mb: 64,
        }
    }
}

impl IndexConfig {
    fn merge(&mut self, patch: IndexPatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.dir {
            self.dir = value;
        }
        if let Some(value) = patch.writer_heap_mb {
            self.writer_heap_mb = value;
        }
    }

    pub fn writer_heap_bytes(&self) -> usize {
        self.writer_heap_mb as usize * 1024 * 1024
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub default_page_size: usize,
    #[serde(default)]
    pub max_page_size: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
            max_page_size: 100,
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: SearchPatch) {
        if let Some(value) = patch.default_page_size {
            self.default_page_size = value;
        }
        if let Some(value) = patch.max_page_size {
            self.max_page_size = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Name recorded in `created_by`/`updated_by` for CLI writes.
    #[serde(default)]
    pub actor: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            actor: "cli".to_string(),
        }
    }
}

impl AuditConfig {
    fn merge(&mut self, patch: AuditPatch) {
        if let Some(value) = patch.actor {
            self.actor = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub index: Option<IndexPatch>,
    pub search: Option<SearchPatch>,
    pub audit: Option<AuditPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IndexPatch {
    pub enabled: Option<bool>,
    pub dir: Option<String>,
    pub writer_heap_mb: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SearchPatch {
    pub default_page_size: Option<usize>,
    pub max_page_size: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct AuditPatch {
    pub actor: Option<String>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

fn env_u32(key: &str) -> Result<Option<u32>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u32>()
            .map(Some)
            .map_err(|err| MemdexError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<usize>()
            .map(Some)
            .map_err(|err| MemdexError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}
