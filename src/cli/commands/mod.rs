use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod chat;
mod comment;
mod rate;
mod show;
mod theme;

pub use chat::{ChatArgs, handle_chat};
pub use comment::{CommentArgs, handle_comment};
pub use rate::{RateArgs, handle_rate};
pub use show::{ShowArgs, handle_show};
pub use theme::{ThemeArgs, handle_theme};

use portfolio_feedback::common::SystemEnvProvider;
use portfolio_feedback::config::Config;
use portfolio_feedback::feedback::{FeedbackClient, FeedbackViewModel};
use portfolio_feedback::storage::FileDocumentStore;

#[derive(Parser)]
#[command(name = "portfolio-feedback")]
#[command(about = "Comments, ratings and chat for a personal portfolio")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Feedback store directory (defaults to $PORTFOLIO_STORE_DIR or .portfolio-feedback)
    #[arg(short, long, global = true)]
    pub store: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show comments and the average rating
    Show(ShowArgs),
    /// Leave a comment
    Comment(CommentArgs),
    /// Rate the portfolio from 1 to 5 stars
    Rate(RateArgs),
    /// Ask the AI assistant a question
    Chat(ChatArgs),
    /// Show or change the theme preference
    Theme(ThemeArgs),
}

pub async fn run_command(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.store, &SystemEnvProvider)?;

    match cli.command {
        Commands::Show(args) => handle_show(&config, args).await,
        Commands::Comment(args) => handle_comment(&config, args).await,
        Commands::Rate(args) => handle_rate(&config, args).await,
        Commands::Chat(args) => handle_chat(&config, args).await,
        Commands::Theme(args) => handle_theme(&config, args),
    }
}

/// Open the store and load the current feedback into a fresh view-model
pub(crate) async fn open_session(
    config: &Config,
) -> Result<(FeedbackClient<FileDocumentStore>, FeedbackViewModel)> {
    let store = FileDocumentStore::init(&config.store_dir)
        .await
        .with_context(|| format!("Cannot open feedback store {}", config.store_dir.display()))?;
    let client = FeedbackClient::new(store);

    let mut view_model = FeedbackViewModel::new(config.write_failure);
    view_model.reload(&client).await;

    Ok((client, view_model))
}

#[cfg(test)]
pub(crate) mod test_support {
    use portfolio_feedback::config::{Config, DEFAULT_CHAT_URL};
    use portfolio_feedback::feedback::WriteFailurePolicy;
    use tempfile::TempDir;

    pub fn setup_temp_config() -> (TempDir, Config) {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let config = Config {
            store_dir: temp_dir.path().to_path_buf(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
            write_failure: WriteFailurePolicy::Keep,
        };
        (temp_dir, config)
    }
}
