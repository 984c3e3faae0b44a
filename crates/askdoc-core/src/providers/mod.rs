//! Source document providers

pub mod pdf;

pub use pdf::{load_documents, load_text, scan_directory, Document};
