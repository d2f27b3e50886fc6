use anyhow::Result;
use clap::Args;

use crate::cli::output::{format_comment, success_message, warning_message};
use portfolio_feedback::config::Config;
use portfolio_feedback::feedback::WriteFailurePolicy;

use super::open_session;

#[derive(Args)]
pub struct CommentArgs {
    /// Your name
    #[arg(short, long)]
    pub name: String,

    /// Your comment
    #[arg(short = 'm', long)]
    pub text: String,
}

pub async fn handle_comment(config: &Config, args: CommentArgs) -> Result<()> {
    let (client, mut view_model) = open_session(config).await?;

    view_model.set_commenter_name(args.name);
    view_model.set_comment_text(args.text);

    let failures_before = view_model.diagnostics().len();
    if !view_model.submit_comment(&client).await {
        println!(
            "{}",
            warning_message("Nothing submitted: both name and comment are required")
        );
        return Ok(());
    }

    let failed = view_model.diagnostics().len() > failures_before;
    if failed && view_model.failure_policy() != WriteFailurePolicy::Keep {
        println!("{}", warning_message("Your comment could not be saved"));
    } else {
        println!("{}", success_message("Thanks for your comment!"));
    }
    if let Some(entry) = view_model.comments().first() {
        print!("{}", format_comment(entry, false));
    }

    Ok(())
}
