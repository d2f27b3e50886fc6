use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::common::EnvProvider;
use crate::feedback::WriteFailurePolicy;

pub const STORE_DIR_VAR: &str = "PORTFOLIO_STORE_DIR";
pub const CHAT_URL_VAR: &str = "PORTFOLIO_CHAT_URL";
pub const WRITE_FAILURE_VAR: &str = "PORTFOLIO_WRITE_FAILURE";

pub const DEFAULT_STORE_DIR: &str = ".portfolio-feedback";
pub const DEFAULT_CHAT_URL: &str = "http://localhost:3000/api/chat";

/// Settings resolved from command-line flags, then the environment, then defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_dir: PathBuf,
    pub chat_url: String,
    pub write_failure: WriteFailurePolicy,
}

impl Config {
    pub fn resolve(store_dir: Option<PathBuf>, env: &impl EnvProvider) -> Result<Self> {
        let store_dir = store_dir
            .or_else(|| env.get_var(STORE_DIR_VAR).map(PathBuf::from))
            .unwrap_or_else(|| {
                log::debug!("{} not set, using default: {}", STORE_DIR_VAR, DEFAULT_STORE_DIR);
                PathBuf::from(DEFAULT_STORE_DIR)
            });

        let chat_url = env
            .get_var(CHAT_URL_VAR)
            .unwrap_or_else(|| DEFAULT_CHAT_URL.to_string());

        let write_failure = match env.get_var(WRITE_FAILURE_VAR) {
            Some(value) => value
                .parse::<WriteFailurePolicy>()
                .with_context(|| format!("Invalid {} value", WRITE_FAILURE_VAR))?,
            None => WriteFailurePolicy::default(),
        };

        Ok(Self {
            store_dir,
            chat_url,
            write_failure,
        })
    }
}
