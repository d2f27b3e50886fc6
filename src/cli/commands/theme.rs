use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::cli::output::{info_message, success_message};
use portfolio_feedback::common::SystemEnvProvider;
use portfolio_feedback::config::Config;
use portfolio_feedback::storage::PreferenceStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeChoice {
    Light,
    Dark,
    Toggle,
}

#[derive(Args)]
pub struct ThemeArgs {
    /// New theme; omit to show the current one
    pub choice: Option<ThemeChoice>,
}

fn theme_name(dark_mode: bool) -> &'static str {
    if dark_mode { "dark" } else { "light" }
}

pub fn handle_theme(config: &Config, args: ThemeArgs) -> Result<()> {
    let mut preferences = PreferenceStore::load(&config.store_dir, &SystemEnvProvider);

    let Some(choice) = args.choice else {
        println!(
            "{}",
            info_message(&format!("Theme: {}", theme_name(preferences.dark_mode())))
        );
        return Ok(());
    };

    let dark_mode = match choice {
        ThemeChoice::Light => preferences.set_dark_mode(false).map(|_| false),
        ThemeChoice::Dark => preferences.set_dark_mode(true).map(|_| true),
        ThemeChoice::Toggle => preferences.toggle(),
    }
    .context("Cannot save theme preference")?;

    println!(
        "{}",
        success_message(&format!("Theme set to {}", theme_name(dark_mode)))
    );
    Ok(())
}
