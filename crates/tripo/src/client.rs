use std::path::{Path, PathBuf};

use reqwest::Client;
use serde_json::Value;

use crate::error::TripoError;

const BASE_URL: &str = "https://api.tripo3d.ai/v2/openapi";
const DOWNLOADS_DIR: &str = "downloads";

pub struct TripoClient {
    client: Client,
    api_key: String,
    base_url: String,
    downloads_dir: PathBuf,
}

impl TripoClient {
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
            downloads_dir: PathBuf::from(DOWNLOADS_DIR),
        }
    }

    /// Override the API base URL (used against a stand-in server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the directory downloaded model files are written to.
    pub fn with_downloads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.downloads_dir = dir.into();
        self
    }

    pub(crate) fn client(&self) -> &Client {
        &self.client
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    /// Reads a response body as JSON; any non-2xx becomes an `Api` error
    /// carrying the remote status code and raw body.
    pub(crate) async fn read_json(&self, response: reqwest::Response) -> crate::Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TripoError::Api {
                status_code: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}
