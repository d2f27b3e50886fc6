use anyhow::Result;
use clap::Args;

use crate::cli::output::{format_comments, format_rating_summary};
use portfolio_feedback::config::Config;

use super::open_session;

#[derive(Args)]
pub struct ShowArgs {
    /// Show at most this many comments, newest first
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Show only the first paragraph of each comment
    #[arg(short, long)]
    pub compact: bool,
}

pub async fn handle_show(config: &Config, args: ShowArgs) -> Result<()> {
    let (_client, view_model) = open_session(config).await?;

    println!("{}\n", format_rating_summary(&view_model));
    print!("{}", format_comments(&view_model, args.limit, args.compact));

    Ok(())
}
