use std::time::Duration;

use reqwest::multipart::{Form, Part};

use crate::client::TripoClient;
use crate::error::{transport, TripoError};
use crate::extract;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

impl TripoClient {
    /// Upload an image for conversion and return the provider's file token.
    /// POST /upload
    ///
    /// The image is normalized (resized, flattened, recompressed) before it
    /// leaves the process; the part's content type is always `image/jpeg`.
    pub async fn upload_image(&self, data: &[u8], filename: &str) -> crate::Result<String> {
        let normalized = imaging::normalize(data);
        tracing::info!("uploading image: {} ({} bytes)", filename, normalized.len());

        let part = Part::bytes(normalized)
            .file_name(filename.to_string())
            .mime_str("image/jpeg")?;
        let form = Form::new().part("file", part).text("type", "image");

        let response = self
            .client()
            .post(self.url("/upload"))
            .bearer_auth(self.api_key())
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| transport("upload", e))?;

        let payload = self.read_json(response).await?;
        match extract::first_match(extract::TOKEN_STRATEGIES, &payload) {
            Some(token) => Ok(token.to_string()),
            None => Err(TripoError::Malformed {
                detail: "could not extract token from upload response".to_string(),
                payload,
            }),
        }
    }
}
