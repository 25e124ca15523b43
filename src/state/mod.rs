/// State management module
///
/// This module handles all application state, including:
/// - The currently selected image and its media type (analysis.rs)
/// - The analysis request lifecycle (analysis.rs)

pub mod analysis;
