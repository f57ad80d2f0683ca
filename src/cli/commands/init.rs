//! memdex init - Initialize a memdex root

use std::path::{Path, PathBuf};

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::config::Config;
use crate::error::{MemdexError, Result};
use crate::search::MemberIndex;
use crate::storage::Database;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (defaults to MEMDEX_ROOT or ./.memdex)
    #[arg(value_name = "DIR")]
    pub path: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &InitArgs) -> Result<()> {
    initialize(ctx.robot_mode, Some(&ctx.root), args)
}

/// Entry point used before an AppContext exists.
pub fn run_without_context(robot: bool, root_flag: Option<&Path>, args: &InitArgs) -> Result<()> {
    initialize(robot, root_flag, args)
}

fn initialize(robot: bool, root_flag: Option<&Path>, args: &InitArgs) -> Result<()> {
    let root = match (&args.path, root_flag) {
        (Some(path), _) => path.clone(),
        (None, Some(root)) => root.to_path_buf(),
        (None, None) => match std::env::var("MEMDEX_ROOT") {
            Ok(root) => PathBuf::from(root),
            Err(_) => std::env::current_dir()?.join(".memdex"),
        },
    };

    std::fs::create_dir_all(&root)?;

    let config_path = root.join("config.toml");
    let created_config = if config_path.exists() {
        false
    } else {
        let defaults = toml::to_string_pretty(&Config::default())
            .map_err(|err| MemdexError::Config(err.to_string()))?;
        std::fs::write(&config_path, defaults)?;
        true
    };

    let config = Config::load(Some(&config_path), &root)?;
    let db = Database::open(root.join("memdex.db"))?;

    let mut index_ready = false;
    if config.index.enabled {
        MemberIndex::open_or_create(root.join(&config.index.dir), config.index.writer_heap_bytes())?;
        index_ready = true;
    }

    if robot {
        println!(
            "{}",
            serde_json::json!({
                "status": "ok",
                "root": root.display().to_string(),
                "schema_version": db.schema_version(),
                "config_created": created_config,
                "index_ready": index_ready,
            })
        );
    } else {
        println!("{} Initialized memdex at {}", "✓".green().bold(), root.display());
        if created_config {
            println!("  wrote {}", config_path.display());
        }
        if index_ready {
            println!("  search index ready");
        } else {
            println!("  {}", "search index disabled in config".yellow());
        }
    }

    Ok(())
}
