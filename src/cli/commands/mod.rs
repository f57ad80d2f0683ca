//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;
use colored::Colorize;

use crate::app::AppContext;
use crate::domain::{MemberRecord, Page, PageRequest};
use crate::error::{MemdexError, Result};

pub mod add;
pub mod init;
pub mod list;
pub mod resync;
pub mod search;
pub mod show;
pub mod update;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a memdex root
    Init(init::InitArgs),

    /// Register a new member
    Add(add::AddArgs),

    /// Update a member's profile
    Update(update::UpdateArgs),

    /// Show a single member
    Show(show::ShowArgs),

    /// List members, ordered by id
    List(list::ListArgs),

    /// Search members by keyword
    Search(search::SearchArgs),

    /// Rebuild the search index from the record store
    Resync(resync::ResyncArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Init(args) => init::run(ctx, args),
        Commands::Add(args) => add::run(ctx, args),
        Commands::Update(args) => update::run(ctx, args),
        Commands::Show(args) => show::run(ctx, args),
        Commands::List(args) => list::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Resync(args) => resync::run(ctx, args),
    }
}

/// Validate page/size against the configured bounds.
pub(crate) fn page_request(ctx: &AppContext, page: usize, size: Option<usize>) -> Result<PageRequest> {
    let size = size.unwrap_or(ctx.config.search.default_page_size);
    if size > ctx.config.search.max_page_size {
        return Err(MemdexError::InvalidPage(format!(
            "page size {size} exceeds the maximum of {}",
            ctx.config.search.max_page_size
        )));
    }
    PageRequest::new(page, size)
}

/// JSON body for a member page in robot mode.
pub(crate) fn member_page_json(page: &Page<MemberRecord>) -> serde_json::Value {
    serde_json::json!({
        "records": page.items(),
        "totalElements": page.total(),
        "totalPages": page.total_pages(),
        "currentPage": page.page(),
        "hasNext": page.has_next(),
        "hasPrev": page.has_prev(),
    })
}

pub(crate) fn print_member_page(page: &Page<MemberRecord>) {
    if page.is_empty() {
        println!("{}", "No members found".yellow());
        return;
    }

    for member in page.items() {
        println!(
            "{:>6}  {:<16} {:<24} {}",
            member.id.to_string().dimmed(),
            member.username.bold(),
            member.name,
            member.email.dimmed()
        );
    }
    println!();
    println!(
        "page {}/{} · {} member{} total{}",
        page.page() + 1,
        page.total_pages().max(1),
        page.total(),
        if page.total() == 1 { "" } else { "s" },
        if page.has_next() { " · more available" } else { "" }
    );
}

pub(crate) fn print_member(member: &MemberRecord) {
    println!("{}  {}", member.username.bold(), format!("#{}", member.id).dimmed());
    println!("  name      {}", member.name);
    println!("  email     {}", member.email);
    if let Some(phone) = &member.phone_number {
        println!("  phone     {phone}");
    }
    if let Some(zipcode) = &member.zipcode {
        println!("  zipcode   {zipcode}");
    }
    if let Some(address) = &member.address {
        println!("  address   {address}");
    }
    if let Some(detail) = &member.detail_address {
        println!("  detail    {detail}");
    }
    if !member.interests.is_empty() {
        println!("  interests {}", member.interests.join(", "));
    }
    println!(
        "  updated   {} by {}",
        member.updated_at.to_rfc3339(),
        member.updated_by.as_deref().unwrap_or("-")
    );
}
