use crate::constants::{DEFAULT_REMOTE_URL, REMOTE_TIMEOUT_SECS};
use crate::error::{CompressionError, Result};
use crate::planner::EncodePlan;
use crate::processing::{CompressionRequest, Decision, SourceImage};
use crate::provider::{CompressionProvider, ProviderOutput};
use crate::verbose;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RemoteOptions {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_REMOTE_URL.to_string(),
            timeout: Duration::from_secs(REMOTE_TIMEOUT_SECS),
        }
    }
}

impl RemoteOptions {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompressResponse {
    success: bool,
    data: Option<CompressData>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompressData {
    compressed_image: String,
    original_size: u64,
    compressed_size: u64,
    compression_ratio: i64,
    format: String,
    dimensions: Option<ResponseDimensions>,
    quality_used: Option<u8>,
    message: Option<String>,
    skipped: Option<bool>,
    fallback_to_original: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct ResponseDimensions {
    width: u32,
    height: u32,
}

/// HTTP compression provider. Sends the original bytes and the caller's
/// request parameters; the service runs the same planning rules server-side
/// and mirrors any skip/no-gain decision in its response metadata.
pub struct RemoteProvider {
    options: RemoteOptions,
}

impl RemoteProvider {
    pub fn new(options: RemoteOptions) -> Self {
        Self { options }
    }

    pub fn base_url(&self) -> &str {
        &self.options.base_url
    }

    /// Checks the service's health endpoint.
    pub async fn health_async(&self) -> Result<()> {
        let client = self.client()?;
        let url = format!("{}/api/health", self.options.base_url);
        let response = client.get(&url).send().await.map_err(map_transport_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CompressionError::ProviderUnavailable(format!(
                "health check returned {}",
                response.status()
            )))
        }
    }

    pub fn health(&self) -> Result<()> {
        runtime()?.block_on(self.health_async())
    }

    async fn encode_async(
        &self,
        image: &SourceImage,
        request: &CompressionRequest,
        plan: &EncodePlan,
    ) -> Result<ProviderOutput> {
        let client = self.client()?;

        let part = reqwest::multipart::Part::bytes(image.bytes().to_vec())
            .file_name("image")
            .mime_str(image.mime_type())
            .map_err(|e| CompressionError::RemoteRejected(e.to_string()))?;

        let mut form = reqwest::multipart::Form::new()
            .part("image", part)
            .text("format", request.target_format.name())
            .text("quality", request.quality.to_string())
            .text(
                "maintainAspectRatio",
                request.maintain_aspect_ratio.to_string(),
            );
        if let Some(max_width) = request.max_width {
            form = form.text("maxWidth", max_width.to_string());
        }
        if let Some(max_height) = request.max_height {
            form = form.text("maxHeight", max_height.to_string());
        }

        let url = format!("{}/api/compress", self.options.base_url);
        let response = client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_client_error() {
            // Bad input; the local provider still gets a chance to reparse
            // the bytes independently.
            let detail = extract_error(response).await;
            return Err(CompressionError::RemoteRejected(format!(
                "{}: {}",
                status, detail
            )));
        }
        if status.is_server_error() {
            let detail = extract_error(response).await;
            return Err(CompressionError::ProviderUnavailable(format!(
                "{}: {}",
                status, detail
            )));
        }

        let envelope: CompressResponse = response
            .json()
            .await
            .map_err(|e| CompressionError::ProviderUnavailable(format!("bad response: {}", e)))?;

        if !envelope.success {
            return Err(CompressionError::ProviderUnavailable(
                envelope
                    .error
                    .unwrap_or_else(|| "remote compression failed".to_string()),
            ));
        }
        let data = envelope.data.ok_or_else(|| {
            CompressionError::ProviderUnavailable("response missing payload".to_string())
        })?;

        if let Some(message) = &data.message {
            verbose!("Remote provider: {}", message);
        }
        verbose!(
            "Remote provider reported {} -> {} bytes ({}%, format {})",
            data.original_size,
            data.compressed_size,
            data.compression_ratio,
            data.format
        );

        let decision_hint = if data.skipped.unwrap_or(false) {
            Some(Decision::SkippedTooSmall)
        } else if data.fallback_to_original.unwrap_or(false) {
            Some(Decision::FallbackNoGain)
        } else {
            None
        };

        let bytes = BASE64
            .decode(&data.compressed_image)
            .map_err(|e| CompressionError::ProviderUnavailable(format!("bad payload: {}", e)))?;

        let (width, height) = data
            .dimensions
            .map(|d| (d.width, d.height))
            .unwrap_or((plan.width, plan.height));

        Ok(ProviderOutput {
            bytes,
            width,
            height,
            quality_used: data.quality_used.unwrap_or(plan.quality),
            decision_hint,
        })
    }

    fn client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.options.timeout)
            .build()
            .map_err(|e| CompressionError::ProviderUnavailable(e.to_string()))
    }
}

impl CompressionProvider for RemoteProvider {
    fn name(&self) -> &str {
        "remote"
    }

    fn encode(
        &self,
        image: &SourceImage,
        request: &CompressionRequest,
        plan: &EncodePlan,
    ) -> Result<ProviderOutput> {
        runtime()?.block_on(self.encode_async(image, request, plan))
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| {
        CompressionError::ProviderUnavailable(format!("failed to create async runtime: {}", e))
    })
}

/// Timeouts and refused connections mean the provider is unreachable, which
/// is exactly what the fallback chain exists for.
fn map_transport_error(e: reqwest::Error) -> CompressionError {
    if e.is_timeout() {
        CompressionError::ProviderUnavailable(format!("request timed out: {}", e))
    } else if e.is_connect() {
        CompressionError::ProviderUnavailable(format!("connection failed: {}", e))
    } else {
        CompressionError::ProviderUnavailable(e.to_string())
    }
}

async fn extract_error(response: reqwest::Response) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => body.error.unwrap_or_else(|| "no detail".to_string()),
        Err(_) => "no detail".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_options_default() {
        let options = RemoteOptions::default();
        assert_eq!(options.base_url, "http://localhost:3001");
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_remote_options_custom_url() {
        let options = RemoteOptions::new(Some("https://compress.example.com".to_string()));
        assert_eq!(options.base_url, "https://compress.example.com");
        assert_eq!(options.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_response_parsing_with_mirror_fields() {
        let json = r#"{
            "success": true,
            "data": {
                "compressedImage": "aGVsbG8=",
                "originalSize": 40000,
                "compressedSize": 40000,
                "compressionRatio": 0,
                "format": "png",
                "message": "already small enough",
                "skipped": true
            }
        }"#;

        let envelope: CompressResponse = serde_json::from_str(json).unwrap();
        let data = envelope.data.unwrap();
        assert!(envelope.success);
        assert_eq!(data.skipped, Some(true));
        assert_eq!(data.fallback_to_original, None);
        assert_eq!(BASE64.decode(&data.compressed_image).unwrap(), b"hello");
    }

    #[test]
    fn test_response_parsing_full_result() {
        let json = r#"{
            "success": true,
            "data": {
                "compressedImage": "AAAA",
                "originalSize": 800000,
                "compressedSize": 200000,
                "compressionRatio": 75,
                "format": "webp",
                "dimensions": { "width": 800, "height": 600 },
                "qualityUsed": 80
            }
        }"#;

        let envelope: CompressResponse = serde_json::from_str(json).unwrap();
        let data = envelope.data.unwrap();
        assert_eq!(data.compression_ratio, 75);
        assert_eq!(data.quality_used, Some(80));
        let dims = data.dimensions.unwrap();
        assert_eq!((dims.width, dims.height), (800, 600));
    }

    #[test]
    fn test_response_parsing_error_envelope() {
        let json = r#"{ "success": false, "error": "unsupported format: avif" }"#;
        let envelope: CompressResponse = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.error.as_deref(), Some("unsupported format: avif"));
        assert!(envelope.data.is_none());
    }
}
