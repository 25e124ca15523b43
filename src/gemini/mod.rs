/// Gemini inference client
///
/// This module sends a single image plus a fixed instructional prompt to
/// the Gemini `generateContent` REST endpoint and returns the generated
/// text. Wire-level request/response structs live in types.rs, the HTTP
/// call and error taxonomy in client.rs.

pub mod client;
pub mod types;

pub use client::{analyze_image, ClientError, GEMINI_MODEL};
