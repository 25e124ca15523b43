/// System clipboard wrapper
///
/// A thin layer over arboard that collapses its errors into the single
/// user-visible message the result panel shows on copy failure.

/// Copy `text` to the system clipboard.
pub fn copy_text(text: &str) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| format!("Failed to copy text to clipboard: {}", e))?;

    clipboard
        .set_text(text.to_string())
        .map_err(|e| format!("Failed to copy text to clipboard: {}", e))
}
