use std::path::PathBuf;
use std::time::Duration;

use crate::client::TripoClient;
use crate::error::{transport, TripoError};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(180);

impl TripoClient {
    /// Download a generated model file to the downloads directory and return
    /// its path. The URL is provider-issued and pre-authenticated, so no
    /// bearer header is sent. Whole-file only, no range support.
    pub async fn download_file(&self, url: &str, filename: &str) -> crate::Result<PathBuf> {
        let response = self
            .client()
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport("download", e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TripoError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::create_dir_all(self.downloads_dir()).await?;
        let path = self.downloads_dir().join(filename);
        tokio::fs::write(&path, &bytes).await?;

        tracing::info!("downloaded file: {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }
}
