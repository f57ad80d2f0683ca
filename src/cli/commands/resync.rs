//! memdex resync - Rebuild the search index from the record store

use std::time::Instant;

use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ResyncArgs {}

pub fn run(ctx: &AppContext, _args: &ResyncArgs) -> Result<()> {
    let start = Instant::now();
    let directory = ctx.directory();

    let count = if ctx.robot_mode {
        directory.resync(|| {})?
    } else {
        let total = ctx.db.count_members()?;
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.set_message("reindexing members");

        let count = directory.resync(|| pb.inc(1))?;
        pb.finish_and_clear();
        count
    };

    let elapsed = start.elapsed();

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({
                "status": "ok",
                "documents": count,
                "elapsed_ms": elapsed.as_millis() as u64,
            })
        );
    } else {
        println!(
            "{} Resynced {} member{} in {:.2}s",
            "✓".green().bold(),
            count,
            if count == 1 { "" } else { "s" },
            elapsed.as_secs_f64()
        );
    }

    Ok(())
}
