use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::corpus::Corpus;
use crate::error::{NotasError, Result};
use std::fs;
use tracing::info;

/// Creates a directory (a name without a dot) or an empty document inside
/// the directory nearest to `rel`.
pub fn run(corpus: &Corpus, rel: &str, name: &str) -> Result<CmdResult> {
    let name = name.trim().trim_start_matches('/');
    if name.is_empty() {
        return Err(NotasError::InvalidInput("a name is required".to_string()));
    }

    let base = corpus.nearest_directory(rel)?;
    let target_rel = format!(
        "{}/{}",
        corpus.relative(&base).trim_end_matches('/'),
        name
    );
    let target = corpus.resolve(&target_rel)?;
    if corpus.is_trash(&target) {
        return Err(NotasError::InvalidPath(format!(
            "{} is in the trash",
            target_rel
        )));
    }

    let mut result = CmdResult::default();
    if !helpers::file_name(&target).contains('.') {
        fs::create_dir_all(&target).map_err(|e| NotasError::io(target_rel.clone(), e))?;
        info!(path = %target_rel, "created directory");
        result.add_message(CmdMessage::success(format!(
            "Created directory {}",
            target_rel
        )));
    } else if corpus.is_document(&target) {
        if corpus.create_empty(&target)? {
            info!(path = %target_rel, "created document");
            result.add_message(CmdMessage::success(format!(
                "Created document {}",
                target_rel
            )));
        } else {
            result.add_message(CmdMessage::warning(format!(
                "{} already exists",
                target_rel
            )));
        }
    } else {
        return Err(NotasError::InvalidInput(format!(
            "only directories and {} documents can be created",
            corpus.config().doc_ext
        )));
    }

    Ok(result.with_paths(vec![target_rel]))
}
