//! Natural dimension probing
//!
//! Fetches just enough of a media resource to learn its natural size. Probes
//! run asynchronously, are bounded by a timeout, and can be cancelled; a
//! cancelled probe never reports a result.

use crate::layout::Dimensions;
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Default time allowed for one probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(8);

/// Largest body the HTTP prober will read (10 MB)
pub const MAX_PROBE_BYTES: usize = 10 * 1024 * 1024;

/// Errors that can occur while probing dimensions
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe did not finish in time
    #[error("Probe timed out after {0:?}")]
    Timeout(Duration),

    /// Network failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The body is not a decodable image
    #[error("Could not decode image header: {0}")]
    Decode(String),

    /// The body exceeds the byte cap
    #[error("Content too large: {size} bytes exceeds maximum {max}")]
    TooLarge {
        /// Bytes seen so far (or announced)
        size: usize,
        /// Maximum allowed size
        max: usize,
    },

    /// The resource reported a zero width or height
    #[error("Resource has zero dimensions")]
    ZeroDimensions,

    /// The probe was cancelled before it finished
    #[error("Probe cancelled")]
    Cancelled,
}

/// Result type for probe operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Something that can determine the natural size of a media URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DimensionProber: Send + Sync {
    /// Load enough of `url` to learn its natural dimensions
    async fn probe(&self, url: &str) -> Result<Dimensions>;
}

/// Probe with a deadline
///
/// On timeout the in-flight probe future is dropped, which abandons its
/// load. Zero dimensions count as a failure.
pub async fn probe_with_timeout(
    prober: &dyn DimensionProber,
    url: &str,
    timeout: Duration,
) -> Result<Dimensions> {
    let outcome = match tokio::time::timeout(timeout, prober.probe(url)).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(timeout)),
    };

    match outcome {
        Ok(dimensions) if dimensions.is_valid() => Ok(dimensions),
        Ok(_) => {
            tracing::debug!("Probe of {} reported zero dimensions", url);
            Err(ProbeError::ZeroDimensions)
        }
        Err(e) => {
            tracing::debug!("Probe of {} failed: {}", url, e);
            Err(e)
        }
    }
}

/// A probe running in the background
///
/// Dropping the task aborts the probe.
pub struct ProbeTask {
    result_rx: Option<oneshot::Receiver<Result<Dimensions>>>,
    handle: JoinHandle<()>,
}

impl ProbeTask {
    /// Spawn a probe of `url` on the current runtime
    pub fn spawn(
        prober: Arc<dyn DimensionProber>,
        url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let url = url.into();
        let (result_tx, result_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let result = probe_with_timeout(prober.as_ref(), &url, timeout).await;
            let _ = result_tx.send(result);
        });

        Self { result_rx: Some(result_rx), handle }
    }

    /// Abort the probe; its result is discarded
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the probe has stopped running
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the probe's result
    ///
    /// Resolves to [`ProbeError::Cancelled`] if the probe was aborted.
    pub async fn result(mut self) -> Result<Dimensions> {
        let Some(result_rx) = self.result_rx.take() else {
            return Err(ProbeError::Cancelled);
        };
        result_rx.await.unwrap_or(Err(ProbeError::Cancelled))
    }
}

impl Drop for ProbeTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Configuration for the HTTP prober
#[derive(Debug, Clone)]
pub struct ProberConfig {
    /// Largest body to read before giving up
    pub max_bytes: usize,
    /// User agent string
    pub user_agent: String,
}

impl Default for ProberConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_PROBE_BYTES,
            user_agent: format!("media-embeds/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ProberConfig {
    /// Set the byte cap
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Prober that streams a resource over HTTP and decodes only its header
///
/// The body is read chunk by chunk and fetching stops as soon as the image
/// header yields a size.
#[derive(Debug, Clone)]
pub struct HttpDimensionProber {
    client: ReqwestClient,
    config: ProberConfig,
}

impl HttpDimensionProber {
    /// Create a prober
    pub fn new(config: ProberConfig) -> Result<Self> {
        let client = ReqwestClient::builder().user_agent(&config.user_agent).build()?;
        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &ProberConfig {
        &self.config
    }
}

#[async_trait]
impl DimensionProber for HttpDimensionProber {
    async fn probe(&self, url: &str) -> Result<Dimensions> {
        let max = self.config.max_bytes;
        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }

        if let Some(length) = response.content_length() {
            let size = usize::try_from(length).unwrap_or(usize::MAX);
            if size > max {
                return Err(ProbeError::TooLarge { size, max });
            }
        }

        let mut buffer = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            buffer.extend_from_slice(&chunk);
            if buffer.len() > max {
                return Err(ProbeError::TooLarge { size: buffer.len(), max });
            }
            if let Ok(dimensions) = read_header(&buffer) {
                tracing::trace!("Probed {} after {} bytes", url, buffer.len());
                return Ok(dimensions);
            }
        }

        read_header(&buffer)
    }
}

/// Decode the natural size from the start of an image file
fn read_header(bytes: &[u8]) -> Result<Dimensions> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ProbeError::Decode(e.to_string()))?;
    let (width, height) = reader.into_dimensions().map_err(|e| ProbeError::Decode(e.to_string()))?;
    Ok(Dimensions { width, height })
}
