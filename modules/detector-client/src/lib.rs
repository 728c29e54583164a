pub mod error;

pub use error::{DetectorError, Result};

/// Client for the object-detection model server. The server takes raw image
/// bytes and answers with the annotated image.
pub struct DetectorClient {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl DetectorClient {
    pub fn new(endpoint: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: Option<String>) -> Self {
        Self { client, endpoint }
    }

    pub async fn annotate(&self, image: Vec<u8>) -> Result<Vec<u8>> {
        let endpoint = self.endpoint.as_deref().ok_or(DetectorError::NotConfigured)?;
        tracing::info!(bytes = image.len(), "Sending image to detector");

        let resp = self
            .client
            .post(endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(DetectorError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let annotated = resp.bytes().await?;
        if annotated.is_empty() {
            return Err(DetectorError::EmptyImage);
        }
        tracing::info!(bytes = annotated.len(), "Detector returned annotated image");

        Ok(annotated.to_vec())
    }
}
