//! memdex list - List members, ordered by id

use clap::Args;

use crate::app::AppContext;
use crate::cli::commands::{member_page_json, page_request, print_member_page};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Zero-based page number
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Page size (defaults to search.default_page_size)
    #[arg(long)]
    pub size: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &ListArgs) -> Result<()> {
    let request = page_request(ctx, args.page, args.size)?;
    let page = ctx.directory().list(&request)?;

    if ctx.robot_mode {
        println!("{}", member_page_json(&page));
    } else {
        print_member_page(&page);
    }

    Ok(())
}
