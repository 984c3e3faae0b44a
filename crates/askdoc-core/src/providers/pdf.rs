//! PDF document loading

use crate::error::{AskDocError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A loaded source document
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
}

/// Extract text from a PDF file.
///
/// Unreadable or corrupt files are errors; a PDF without an extractable
/// text layer (scans) yields empty text and the caller decides what an
/// empty corpus means.
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| {
        AskDocError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read PDF file {:?}: {}", path, e),
        ))
    })?;

    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        AskDocError::Parse(format!("Failed to extract text from PDF {:?}: {}", path, e))
    })?;

    if text.trim().is_empty() {
        tracing::warn!("PDF {:?} contains no extractable text layer", path);
    }

    Ok(text)
}

/// Scan a directory for PDF files matching a glob pattern, sorted by path
/// so corpus order is stable across runs.
pub fn scan_directory(base_path: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    if !base_path.exists() {
        return Err(AskDocError::NoDocuments(base_path.display().to_string()));
    }

    let glob_pattern = glob::Pattern::new(pattern)?;
    let mut pdf_files = Vec::new();

    for entry in WalkDir::new(base_path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.')
                && !matches!(
                    name.as_ref(),
                    "node_modules" | ".git" | ".cache" | "target" | "dist" | "build"
                )
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if let Some(ext) = path.extension() {
            if ext.eq_ignore_ascii_case("pdf") {
                if let Ok(relative) = path.strip_prefix(base_path) {
                    if glob_pattern.matches(&relative.to_string_lossy()) {
                        pdf_files.push(path.to_path_buf());
                    }
                }
            }
        }
    }

    pdf_files.sort();
    Ok(pdf_files)
}

/// Load every matching PDF under a directory.
///
/// Fails with `NoDocuments` when the scan finds nothing; read and parse
/// errors on individual files propagate rather than being skipped.
pub fn load_documents(base_path: &Path, pattern: &str) -> Result<Vec<Document>> {
    let files = scan_directory(base_path, pattern)?;
    if files.is_empty() {
        return Err(AskDocError::NoDocuments(base_path.display().to_string()));
    }

    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        tracing::info!("Loading {:?}", path);
        let text = load_text(&path)?;
        documents.push(Document { path, text });
    }

    Ok(documents)
}
