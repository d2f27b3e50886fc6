use anyhow::Result;
use clap::Args;

use crate::cli::output::{format_rating_summary, format_stars, success_message, warning_message};
use portfolio_feedback::config::Config;
use portfolio_feedback::feedback::WriteFailurePolicy;

use super::open_session;

#[derive(Args)]
pub struct RateArgs {
    /// Number of stars, 1 to 5
    pub stars: u8,
}

pub async fn handle_rate(config: &Config, args: RateArgs) -> Result<()> {
    let (client, mut view_model) = open_session(config).await?;

    view_model.select_rating(args.stars);
    if !view_model.can_submit_rating() {
        anyhow::bail!("Invalid rating '{}'. Choose between 1 and 5 stars", args.stars);
    }

    let failures_before = view_model.diagnostics().len();
    view_model.submit_rating(&client).await;

    let failed = view_model.diagnostics().len() > failures_before;
    if failed && view_model.failure_policy() != WriteFailurePolicy::Keep {
        println!("{}", warning_message("Your rating could not be saved"));
    } else {
        println!(
            "{}",
            success_message(&format!("Thanks for rating {}", format_stars(args.stars)))
        );
    }
    println!("{}", format_rating_summary(&view_model));

    Ok(())
}
