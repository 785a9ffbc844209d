//! HTTP client for the generative model.

use crate::config::FeedbackConfig;
use crate::error::{FeedbackError, FeedbackResult};
use crate::prompt::{
    ANALYSIS_FALLBACK, CHAT_FALLBACK, GenerateRequest, GenerateResponse, NO_REPLY, extract_reply,
};
use reqwest::Client;
use std::sync::Arc;
use url::Url;

/// Asynchronous feedback client. Cheap to clone.
#[derive(Clone)]
pub struct FeedbackClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
    model: String,
}

impl FeedbackClient {
    pub fn new(config: &FeedbackConfig) -> FeedbackResult<Self> {
        let endpoint = config.endpoint()?;

        #[cfg(not(target_arch = "wasm32"))]
        let http = Client::builder()
            .user_agent(concat!("doodlepad/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;
        #[cfg(target_arch = "wasm32")]
        let http = Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                endpoint,
                model: config.model.clone(),
            }),
        })
    }

    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Ask for feedback on an exported PNG.
    pub async fn try_analyze_drawing(&self, png: &[u8]) -> FeedbackResult<String> {
        log::info!("Requesting feedback on a {} byte drawing", png.len());
        self.generate(&GenerateRequest::image_analysis(png)).await
    }

    /// Like [`Self::try_analyze_drawing`], but failures become a fixed
    /// user-facing message.
    pub async fn analyze_drawing(&self, png: &[u8]) -> String {
        match self.try_analyze_drawing(png).await {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Error analyzing drawing: {}", e);
                ANALYSIS_FALLBACK.to_string()
            }
        }
    }

    /// Send one chat message.
    pub async fn try_chat(&self, message: &str) -> FeedbackResult<String> {
        self.generate(&GenerateRequest::chat(message)).await
    }

    /// Like [`Self::try_chat`]: a reply without text yields "No reply.",
    /// any other failure a fixed apology.
    pub async fn chat(&self, message: &str) -> String {
        match self.try_chat(message).await {
            Ok(reply) => reply,
            Err(FeedbackError::EmptyReply) => NO_REPLY.to_string(),
            Err(e) => {
                log::error!("Error fetching AI reply: {}", e);
                CHAT_FALLBACK.to_string()
            }
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> FeedbackResult<String> {
        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .json(request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        log::debug!("{} replied {} ({} bytes)", self.inner.model, status, body.len());

        let parsed = serde_json::from_str::<GenerateResponse>(&body);
        if !status.is_success() {
            let message = match parsed {
                Ok(GenerateResponse { error: Some(error), .. }) => error.message,
                _ => body,
            };
            return Err(FeedbackError::Service {
                status: status.as_u16(),
                message,
            });
        }
        extract_reply(&parsed?)
    }
}

impl std::fmt::Debug for FeedbackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The endpoint carries the API key in its query.
        f.debug_struct("FeedbackClient")
            .field("model", &self.inner.model)
            .field("host", &self.inner.endpoint.host_str())
            .finish()
    }
}
