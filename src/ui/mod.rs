/// UI building blocks
///
/// View-only helpers for the two panels of the main window. All state
/// lives in the application struct; these functions just render it.

pub mod panels;
