use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::corpus::Corpus;
use crate::error::{NotasError, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::io;
use tracing::info;

const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Soft-deletes an entry by moving it into the trash directory as
/// `<YYYYMMDD-HHMMSS>_<name>`. Nothing already in the trash is overwritten:
/// a second deletion within the same second becomes `<stamp>-1_<name>`.
pub fn run(corpus: &Corpus, rel: &str, now: NaiveDateTime) -> Result<CmdResult> {
    let source = corpus.resolve(rel)?;
    if source == corpus.root() {
        return Err(NotasError::InvalidPath(
            "the corpus root cannot be trashed".to_string(),
        ));
    }
    if corpus.is_trash(&source) {
        return Err(NotasError::InvalidPath(format!("{} is already in the trash", rel)));
    }
    if !source.exists() {
        return Err(NotasError::io(
            corpus.relative(&source),
            io::Error::new(io::ErrorKind::NotFound, "nothing to trash"),
        ));
    }

    let trash = corpus.prepare_trash()?;

    let name = helpers::file_name(&source);
    let stamp = now.format(STAMP_FORMAT).to_string();
    let mut target = trash.join(format!("{}_{}", stamp, name));
    let mut attempt = 1;
    while target.exists() {
        target = trash.join(format!("{}-{}_{}", stamp, attempt, name));
        attempt += 1;
    }

    let from = corpus.relative(&source);
    let to = corpus.relative(&target);
    fs::rename(&source, &target).map_err(|e| NotasError::io(from.clone(), e))?;
    info!(from = %from, to = %to, "moved to trash");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Moved {} to {}", from, to)));
    Ok(result.with_paths(vec![to]))
}
