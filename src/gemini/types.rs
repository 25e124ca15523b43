use serde::{Deserialize, Serialize};

/// Request body for the `generateContent` endpoint.
///
/// Gemini format: one user content whose parts carry the inline image
/// data and the instructional prompt.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

/// A single content part: either text or inline binary data, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Standard base64 of the image bytes
    pub data: String,
}

impl GenerateContentRequest {
    /// Build the one request this application ever sends: the encoded
    /// image paired with its media type, followed by the prompt.
    pub fn for_image(encoded: String, media_type: &str, prompt: &str) -> Self {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        text: None,
                        inline_data: Some(InlineData {
                            mime_type: media_type.to_string(),
                            data: encoded,
                        }),
                    },
                    Part {
                        text: Some(prompt.to_string()),
                        inline_data: None,
                    },
                ],
            }],
        }
    }
}

/// Response body for `generateContent`.
///
/// Only the fields we read are modeled; everything else in the payload
/// (safety ratings, usage metadata) is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    ///
    /// Gemini format: candidates[0].content.parts[*].text. Returns `None`
    /// when the response carries no text at all, which the caller treats
    /// as a response of unrecognized shape.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;

        let mut text = String::new();
        for part in &content.parts {
            if let Some(chunk) = &part.text {
                text.push_str(chunk);
            }
        }

        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
