//! memdex update - Update a member's profile

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::print_member;
use crate::domain::MemberPatch;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Member id
    pub id: i64,

    /// New real name
    #[arg(long)]
    pub name: Option<String>,

    /// New email address
    #[arg(long)]
    pub email: Option<String>,

    /// New phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// New postal code
    #[arg(long)]
    pub zipcode: Option<String>,

    /// New street address
    #[arg(long)]
    pub address: Option<String>,

    /// New address detail
    #[arg(long)]
    pub detail_address: Option<String>,

    /// Replace the interest list (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub interests: Option<Vec<String>>,
}

pub fn run(ctx: &AppContext, args: &UpdateArgs) -> Result<()> {
    let patch = MemberPatch {
        name: args.name.clone(),
        email: args.email.clone(),
        phone_number: args.phone.clone(),
        zipcode: args.zipcode.clone(),
        address: args.address.clone(),
        detail_address: args.detail_address.clone(),
        interests: args.interests.clone(),
    };

    let record = ctx.directory().update_profile(args.id, &patch)?;

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "member": record })
        );
    } else {
        println!("{} Updated member #{}", "✓".green().bold(), record.id);
        print_member(&record);
    }

    Ok(())
}
