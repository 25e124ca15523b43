use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use super::types::{GenerateContentRequest, GenerateContentResponse};

/// The multimodal model every analysis request targets.
pub const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Fixed instructional prompt sent alongside every image.
const ANALYSIS_PROMPT: &str = "Provide a comprehensive interpretation of every aspect of this \
image. Format your response in Markdown, using headings, lists and bold text for a polished \
layout.";

/// Failures the analysis call can surface.
///
/// The `Display` of each variant is the exact string shown to the user,
/// so the messages are written for people, not for matching.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClientError {
    /// GEMINI_API_KEY was missing or empty; checked before any network attempt
    #[error("API key not found. Please ensure it is configured correctly.")]
    MissingApiKey,
    /// Transport failure or an error payload from the service
    #[error("An error occurred: {0}")]
    Api(String),
    /// The service answered, but with nothing recognizable as text
    #[error("An unknown error occurred while analyzing the image.")]
    Unknown,
}

/// Analyze an image with Gemini and return the generated text verbatim.
///
/// Sends exactly one `generateContent` request; no retry, no timeout
/// beyond the transport default. The credential is read from the
/// environment at call time so a key exported after launch still works.
pub async fn analyze_image(bytes: Vec<u8>, media_type: String) -> Result<String, ClientError> {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            log::error!("[gemini] GEMINI_API_KEY is not set");
            return Err(ClientError::MissingApiKey);
        }
    };

    let encoded = STANDARD.encode(&bytes);
    let request = GenerateContentRequest::for_image(encoded, &media_type, ANALYSIS_PROMPT);

    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
        GEMINI_MODEL, api_key
    );

    log::info!(
        "[gemini] Analyzing {} bytes ({}) with {}",
        bytes.len(),
        media_type,
        GEMINI_MODEL
    );
    let start = std::time::Instant::now();

    let response = reqwest::Client::new()
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            log::error!("[gemini] HTTP request failed: {}", e);
            ClientError::Api(e.to_string())
        })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        log::error!("[gemini] API returned {}: {}", status, body);
        return Err(ClientError::Api(format!("Gemini returned {}: {}", status, body)));
    }

    let payload: GenerateContentResponse = response.json().await.map_err(|e| {
        log::error!("[gemini] Failed to decode response: {}", e);
        ClientError::Api(e.to_string())
    })?;

    log::info!("[gemini] Response in {}ms", start.elapsed().as_millis());

    // A 200 with no text in it has no message worth wrapping
    payload.text().ok_or(ClientError::Unknown)
}
