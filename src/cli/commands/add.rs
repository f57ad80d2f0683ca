//! memdex add - Register a new member

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::commands::print_member;
use crate::domain::NewMember;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Login username (unique)
    #[arg(long)]
    pub username: String,

    /// Real name
    #[arg(long)]
    pub name: String,

    /// Email address (unique)
    #[arg(long)]
    pub email: String,

    /// Phone number, digits only
    #[arg(long)]
    pub phone: Option<String>,

    /// Postal code
    #[arg(long)]
    pub zipcode: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// Address detail (unit, floor, ...)
    #[arg(long)]
    pub detail_address: Option<String>,

    /// Comma-separated interests
    #[arg(long, value_delimiter = ',')]
    pub interests: Vec<String>,
}

pub fn run(ctx: &AppContext, args: &AddArgs) -> Result<()> {
    let record = ctx.directory().register(NewMember {
        username: args.username.clone(),
        name: args.name.clone(),
        email: args.email.clone(),
        phone_number: args.phone.clone(),
        zipcode: args.zipcode.clone(),
        address: args.address.clone(),
        detail_address: args.detail_address.clone(),
        interests: args.interests.clone(),
    })?;

    if ctx.robot_mode {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "member": record })
        );
    } else {
        println!("{} Registered member #{}", "✓".green().bold(), record.id);
        print_member(&record);
    }

    Ok(())
}
