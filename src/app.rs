use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::warn;

use crate::config::Config;
use crate::directory::Directory;
use crate::error::{MemdexError, Result};
use crate::search::{IndexHandle, MemberIndex};
use crate::storage::Database;

pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub db: Arc<Database>,
    pub index: IndexHandle,
    pub robot_mode: bool,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => Self::find_root()?,
        };
        let config = Config::load(cli.config.as_deref(), &root)?;

        let db = Arc::new(Database::open(root.join("memdex.db"))?);
        let index = open_index(&root, &config);

        Ok(Self {
            root,
            config,
            db,
            index,
            robot_mode: cli.robot,
        })
    }

    /// The directory service bound to this context's stores and audit actor.
    pub fn directory(&self) -> Directory<'_> {
        Directory::new(&self.db, &self.index, &self.config.audit.actor)
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("MEMDEX_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".memdex")? {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| MemdexError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("memdex"))
    }
}

/// Resolve the index capability once. A disabled or unopenable index is not
/// fatal: the resolver degrades to the relational fallback.
fn open_index(root: &Path, config: &Config) -> IndexHandle {
    if !config.index.enabled {
        return IndexHandle::Unavailable;
    }

    let dir = root.join(&config.index.dir);
    match MemberIndex::open_or_create(&dir, config.index.writer_heap_bytes()) {
        Ok(index) => IndexHandle::Available(index),
        Err(cause) => {
            warn!(
                dir = %dir.display(),
                error = %cause,
                "search index unavailable, falling back to relational search"
            );
            IndexHandle::Unavailable
        }
    }
}

fn find_upwards(start: &Path, name: &str) -> Result<Option<PathBuf>> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Ok(Some(candidate));
        }
        current = dir.parent();
    }
    Ok(None)
}
