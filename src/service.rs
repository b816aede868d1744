//! Access to the remote annotation service.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info_span, Instrument};

use crate::config::Config;
use crate::error::{VisionError, VisionResult};
use crate::model::{
    AnnotateImageRequest, AnnotateImageResponse, BatchAnnotateImagesRequest,
    BatchAnnotateImagesResponse, Status,
};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Anything that can answer a batch of annotation requests.
///
/// Implementations return one response per request, in request order.
#[async_trait]
pub trait AnnotationService: Send + Sync {
    async fn batch_annotate(
        &self,
        requests: Vec<AnnotateImageRequest>,
    ) -> VisionResult<Vec<AnnotateImageResponse>>;
}

#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> VisionResult<String>;
}

/// Mints tokens from a service account key file.
pub struct ServiceAccountTokenSource {
    account: CustomServiceAccount,
}

impl ServiceAccountTokenSource {
    pub fn from_file(path: &Path) -> VisionResult<Self> {
        let account = CustomServiceAccount::from_file(path).map_err(|e| {
            VisionError::auth(format!(
                "failed to load service account from {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self { account })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> VisionResult<String> {
        let token = self
            .account
            .token(&[CLOUD_PLATFORM_SCOPE])
            .await
            .map_err(|e| VisionError::auth(format!("failed to obtain access token: {e}")))?;
        Ok(token.as_str().to_string())
    }
}

/// A fixed bearer token, e.g. one printed by `gcloud auth print-access-token`.
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> VisionResult<String> {
        Ok(self.0.clone())
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Status,
}

/// Calls `POST {endpoint}/v1/images:annotate`.
pub struct HttpAnnotationService {
    http: Client,
    url: String,
    tokens: Arc<dyn TokenSource>,
}

impl HttpAnnotationService {
    pub fn new(endpoint: &str, tokens: Arc<dyn TokenSource>) -> VisionResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("image-annotator/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            url: format!("{}/v1/images:annotate", endpoint.trim_end_matches('/')),
            tokens,
        })
    }

    pub fn from_config(config: &Config) -> VisionResult<Self> {
        let tokens = ServiceAccountTokenSource::from_file(&config.credentials_path)?;
        Self::new(&config.endpoint, Arc::new(tokens))
    }
}

#[async_trait]
impl AnnotationService for HttpAnnotationService {
    async fn batch_annotate(
        &self,
        requests: Vec<AnnotateImageRequest>,
    ) -> VisionResult<Vec<AnnotateImageResponse>> {
        let count = requests.len();
        let span = info_span!("images_annotate", requests = count);

        async move {
            let token = self.tokens.access_token().await?;
            let response = self
                .http
                .post(&self.url)
                .bearer_auth(token)
                .json(&BatchAnnotateImagesRequest { requests })
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ErrorEnvelope>(&body)
                    .map(|envelope| envelope.error.message)
                    .unwrap_or(body);
                return Err(VisionError::Service {
                    status: status.as_u16(),
                    message,
                });
            }

            let batch: BatchAnnotateImagesResponse = response.json().await?;
            debug!(responses = batch.responses.len(), "annotate call succeeded");
            Ok(batch.responses)
        }
        .instrument(span)
        .await
    }
}
