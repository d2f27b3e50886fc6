use clap::Parser;
use env_logger::Env;

mod cli;

use cli::{Cli, run_command};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(err) = run_command(cli).await {
        eprintln!("{}", cli::error_message(&format!("{:#}", err)));
        std::process::exit(1);
    }
}
