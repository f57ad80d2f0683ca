//! memdex search - Search members by keyword

use clap::Args;
use tracing::debug;

use crate::app::AppContext;
use crate::cli::commands::{member_page_json, page_request, print_member_page};
use crate::error::Result;
use crate::search::SearchMode;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search keyword; omit to list everything
    #[arg(value_name = "KEYWORD")]
    pub keyword: Option<String>,

    /// Pin a single search tier instead of running the cascade
    #[arg(long, value_enum)]
    pub mode: Option<SearchMode>,

    /// Zero-based page number
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Page size (defaults to search.default_page_size)
    #[arg(long)]
    pub size: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let request = page_request(ctx, args.page, args.size)?;
    debug!(
        keyword = args.keyword.as_deref().unwrap_or(""),
        mode = ?args.mode,
        index_available = ctx.index.is_available(),
        "resolving search"
    );

    let page = ctx
        .directory()
        .search(args.keyword.as_deref(), args.mode, &request)?;

    if ctx.robot_mode {
        println!("{}", member_page_json(&page));
    } else {
        print_member_page(&page);
    }

    Ok(())
}
