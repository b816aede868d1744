use std::path::PathBuf;

use crate::error::{VisionError, VisionResult};

pub const CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const ENDPOINT_VAR: &str = "VISION_ENDPOINT";
pub const MAX_IMAGE_BYTES_VAR: &str = "VISION_MAX_IMAGE_BYTES";

pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com";

/// Raw images above this size are rejected before upload. The JSON request is
/// capped at 10 MB and base64 inflates the payload by a third.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 7 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Service account key file used to mint access tokens.
    pub credentials_path: PathBuf,
    /// Base URL of the Vision REST API.
    pub endpoint: String,
    pub max_image_bytes: usize,
}

impl Config {
    pub fn from_env() -> VisionResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> VisionResult<Self> {
        let credentials_path = lookup(CREDENTIALS_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| VisionError::config(format!("{CREDENTIALS_VAR} not set")))?;

        let endpoint = lookup(ENDPOINT_VAR)
            .filter(|value| !value.is_empty())
            .map(|value| value.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let max_image_bytes = lookup(MAX_IMAGE_BYTES_VAR).filter(|value| !value.is_empty());
        let max_image_bytes = match max_image_bytes {
            Some(raw) => raw
                .parse()
                .ok()
                .filter(|bytes: &usize| *bytes > 0)
                .ok_or_else(|| {
                    VisionError::config(format!(
                        "{MAX_IMAGE_BYTES_VAR} must be a positive byte count, got {raw:?}"
                    ))
                })?,
            None => DEFAULT_MAX_IMAGE_BYTES,
        };

        Ok(Self {
            credentials_path,
            endpoint,
            max_image_bytes,
        })
    }
}
