//! memdex - member directory CLI
//!
//! Keyword search over a member directory: a tiered full-text cascade with
//! a relational fallback.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use memdex::app::AppContext;
use memdex::cli::{Cli, Commands};
use memdex::Result;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot {
                // Robot mode: JSON error output to stdout
                let code = match &e {
                    memdex::MemdexError::DuplicateMember(_) => "duplicate_member",
                    memdex::MemdexError::MemberNotFound(_) => "not_found",
                    memdex::MemdexError::InvalidMember(_) => "invalid_member",
                    memdex::MemdexError::InvalidPage(_) => "invalid_page",
                    memdex::MemdexError::Config(_) | memdex::MemdexError::MissingConfig(_) => {
                        "config"
                    }
                    _ => "error",
                };
                let error_json = serde_json::json!({
                    "error": true,
                    "code": code,
                    "message": e.to_string(),
                });
                println!("{}", serde_json::to_string(&error_json).unwrap_or_default());
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Init(args) = &cli.command {
        return memdex::cli::commands::init::run_without_context(cli.robot, cli.root.as_deref(), args);
    }
    let ctx = AppContext::from_cli(cli)?;
    memdex::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,memdex=info",
        1 => "info,memdex=debug",
        2 => "debug,memdex=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot {
        // JSON logging for robot mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
