use std::path::Path;

/// The image the user has currently selected for analysis.
///
/// Replaced wholesale on every new selection; there is no identity
/// beyond "the currently selected one" and nothing is persisted.
#[derive(Debug, Clone)]
pub struct SelectedImage {
    /// Display name (e.g., "IMG_0001.png")
    pub file_name: String,
    /// Declared media type derived from the file extension (e.g., "image/png")
    pub media_type: String,
    /// The raw file bytes, exactly as read from disk
    pub bytes: Vec<u8>,
    /// Pixel dimensions probed from the bytes, if they decode as an image
    pub dimensions: Option<(u32, u32)>,
}

impl SelectedImage {
    /// Whether the declared media type identifies an image.
    ///
    /// Validation lives here, on the presentation side, rather than in the
    /// file chooser: the chooser hands over whatever the user picked.
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Lifecycle of a single analysis request.
///
/// An explicit enum instead of loose booleans, so impossible combinations
/// (loading with a result, loading with an error) cannot be represented.
/// `Loading` carries the request generation that produced it; a completion
/// arriving with any other token belongs to a superseded request and is
/// discarded rather than applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Analysis {
    /// No analysis has run for the current image
    #[default]
    Idle,
    /// A request is in flight; `token` identifies it
    Loading { token: u64 },
    /// The model's generated text, stored verbatim
    Complete(String),
    /// A human-readable failure message
    Failed(String),
}

impl Analysis {
    pub fn is_loading(&self) -> bool {
        matches!(self, Analysis::Loading { .. })
    }

    /// True when `token` matches the in-flight request.
    pub fn is_current(&self, token: u64) -> bool {
        matches!(self, Analysis::Loading { token: current } if *current == token)
    }

    /// The generated text, if the last request completed successfully.
    pub fn result_text(&self) -> Option<&str> {
        match self {
            Analysis::Complete(text) => Some(text),
            _ => None,
        }
    }
}

/// Derive a media type from a file extension.
///
/// The native file dialog hands us a path, not a content type, so the
/// declared media type comes from the extension. Anything unrecognized
/// falls back to a generic binary type, which then fails the `image/`
/// validation in the presentation surface.
pub fn media_type_for_path(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let media_type = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    };

    media_type.to_string()
}
