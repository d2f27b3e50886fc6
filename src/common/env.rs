//! Environment variable access
//!
//! Configuration and the system theme preference are read through
//! [`EnvProvider`] so tests can inject values without touching the process
//! environment.

#[cfg(test)]
use std::collections::HashMap;

/// Trait for accessing environment variables in a testable way
pub trait EnvProvider {
    /// Get the value of an environment variable
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation that uses the system environment
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Test-only mock implementation for environment variables
#[cfg(test)]
pub struct MockEnvProvider {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvProvider {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn remove_var(&mut self, key: &str) -> &mut Self {
        self.vars.remove(key);
        self
    }

    /// Create a mock whose terminal reports the given background colour index
    pub fn with_terminal_background(background: u8) -> Self {
        let mut mock = Self::new();
        mock.set_var("COLORFGBG", format!("15;{}", background));
        mock
    }
}

#[cfg(test)]
impl EnvProvider for MockEnvProvider {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
