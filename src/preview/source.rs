use async_trait::async_trait;
use std::time::Duration;

use super::{DocumentPreview, Locator, PreviewState};
use crate::core::{RenderFailure, Result, SyncError};

/// Resolves a locator to a renderable document and reports its page count.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn load(&self, locator: &Locator) -> std::result::Result<usize, RenderFailure>;
}

/// Feeds load outcomes into `preview` until it leaves `Loading`.
pub async fn load_preview(preview: &mut DocumentPreview, source: &dyn DocumentSource) -> PreviewState {
    while preview.state().is_loading() {
        let locator = preview.active_locator().clone();
        match source.load(&locator).await {
            Ok(page_count) => {
                preview.on_load_success(&locator, page_count);
            }
            Err(failure) => {
                preview.on_load_failure(&locator, failure.reason);
            }
        }
    }
    preview.state().clone()
}

/// Fetches documents over HTTP and counts PDF pages.
#[derive(Debug, Clone)]
pub struct HttpDocumentSource {
    client: reqwest::Client,
}

impl HttpDocumentSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SyncError::Config(format!("failed to build HTTP client: {}", err)))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn render_failure(locator: &Locator, reason: impl Into<String>) -> RenderFailure {
    RenderFailure {
        locator: locator.to_string(),
        reason: reason.into(),
    }
}

/// Number of pages in a PDF held in memory.
pub fn count_pdf_pages(bytes: &[u8]) -> std::result::Result<usize, String> {
    let document = lopdf::Document::load_mem(bytes).map_err(|err| err.to_string())?;
    Ok(document.get_pages().len())
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    async fn load(&self, locator: &Locator) -> std::result::Result<usize, RenderFailure> {
        let response = self
            .client
            .get(locator.as_str())
            .send()
            .await
            .map_err(|err| render_failure(locator, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(render_failure(locator, format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| render_failure(locator, err.to_string()))?
            .to_vec();

        tokio::task::spawn_blocking(move || count_pdf_pages(&bytes))
            .await
            .map_err(|err| render_failure(locator, err.to_string()))?
            .map_err(|reason| render_failure(locator, reason))
    }
}
