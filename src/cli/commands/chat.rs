use anyhow::Result;
use clap::Args;
use console::style;

use crate::cli::output::warning_message;
use portfolio_feedback::chat::{ChatRelay, HttpChatTransport};
use portfolio_feedback::config::Config;

#[derive(Args)]
pub struct ChatArgs {
    /// Your question
    #[arg(required = true, trailing_var_arg = true)]
    pub message: Vec<String>,
}

pub async fn handle_chat(config: &Config, args: ChatArgs) -> Result<()> {
    let message = args.message.join(" ");
    let relay = ChatRelay::new(HttpChatTransport::new(config.chat_url.clone()));

    match relay.ask(&message).await {
        Some(reply) => println!("{} {}", style("AI:").bold().magenta(), reply),
        None => println!("{}", warning_message("Ask something first")),
    }

    Ok(())
}
