use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const API_KEY_ENV: &str = "TRIPO3D_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bearer credential for the remote conversion API. Absence is not
    /// fatal; endpoints fail per-request until it is configured.
    pub api_key: Option<String>,
    /// Override for the remote API base URL (tests point this at a local
    /// stand-in server).
    pub base_url: Option<String>,
    /// Directory downloaded model files are written to.
    pub downloads_dir: PathBuf,
}

impl Config {
    pub fn new(api_key: Option<String>, downloads_dir: PathBuf) -> Self {
        Self {
            api_key,
            base_url: None,
            downloads_dir,
        }
    }

    /// Reads the credential from the process environment.
    pub fn from_env(downloads_dir: PathBuf) -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        match &api_key {
            Some(_) => tracing::info!("{} loaded successfully", API_KEY_ENV),
            None => tracing::warn!("{} environment variable not set", API_KEY_ENV),
        }
        Self::new(api_key, downloads_dir)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
