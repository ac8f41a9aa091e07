//! Settings file loading and API key resolution.

mod manager;

pub use manager::{ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, Settings};

/// Supplies the API key at the moment an operation starts.
pub trait ApiKeySource: Send + Sync {
    /// The current key; empty when none is configured.
    fn api_key(&self) -> String;
}

impl ApiKeySource for String {
    fn api_key(&self) -> String {
        self.clone()
    }
}
