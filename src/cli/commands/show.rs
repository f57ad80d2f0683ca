//! memdex show - Show a single member

use clap::Args;

use crate::app::AppContext;
use crate::cli::commands::print_member;
use crate::error::{MemdexError, Result};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Member id
    #[arg(value_name = "ID", conflicts_with = "username", required_unless_present = "username")]
    pub id: Option<i64>,

    /// Look up by username instead of id
    #[arg(long)]
    pub username: Option<String>,
}

pub fn run(ctx: &AppContext, args: &ShowArgs) -> Result<()> {
    let directory = ctx.directory();

    let record = match (&args.id, &args.username) {
        (Some(id), _) => directory
            .member_by_id(*id)?
            .ok_or_else(|| MemdexError::MemberNotFound(format!("member id {id}")))?,
        (None, Some(username)) => directory
            .member_by_username(username)?
            .ok_or_else(|| MemdexError::MemberNotFound(format!("username {username}")))?,
        (None, None) => unreachable!("clap enforces id or --username"),
    };

    if ctx.robot_mode {
        println!("{}", serde_json::json!({ "status": "ok", "member": record }));
    } else {
        print_member(&record);
    }

    Ok(())
}
