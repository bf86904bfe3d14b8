use crate::corpus::Corpus;
use crate::error::{NotasError, Result};
use std::path::{Path, PathBuf};

/// Resolves `rel` as a live document: right extension, outside the trash.
pub fn document_path(corpus: &Corpus, rel: &str) -> Result<PathBuf> {
    let path = corpus.resolve(rel)?;
    if !corpus.is_document(&path) {
        return Err(NotasError::InvalidPath(format!(
            "{} is not a {} document",
            rel,
            corpus.config().doc_ext
        )));
    }
    if corpus.is_trash(&path) {
        return Err(NotasError::InvalidPath(format!("{} is in the trash", rel)));
    }
    if path.is_dir() {
        return Err(NotasError::InvalidPath(format!("{} is a directory", rel)));
    }
    Ok(path)
}

/// Resolves `rel` as an existing directory outside the trash.
pub fn directory_path(corpus: &Corpus, rel: &str) -> Result<PathBuf> {
    let path = corpus.resolve(rel)?;
    if !path.is_dir() {
        return Err(NotasError::InvalidPath(format!("{} is not a directory", rel)));
    }
    if corpus.is_trash(&path) {
        return Err(NotasError::InvalidPath(format!("{} is in the trash", rel)));
    }
    Ok(path)
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
