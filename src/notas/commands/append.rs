use crate::codec;
use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::corpus::Corpus;
use crate::error::{NotasError, Result};
use crate::model::Block;
use chrono::NaiveDateTime;
use tracing::info;

/// Adds a markdown block stamped with `now` to the end of a document.
pub fn run(corpus: &Corpus, rel: &str, content: &str, now: NaiveDateTime) -> Result<CmdResult> {
    if content.trim().is_empty() {
        return Err(NotasError::InvalidInput("block content is empty".to_string()));
    }

    let path = helpers::document_path(corpus, rel)?;
    corpus.create_empty(&path)?;
    let mut blocks = codec::parse(&corpus.read_document(&path)?)?;

    let stamp = now.format(&corpus.config().timestamp_format).to_string();
    blocks.push(Block::markdown(content, &stamp));
    codec::validate(&blocks)?;
    corpus.write_atomic(&path, codec::serialize(&blocks).as_bytes())?;

    let shown = corpus.relative(&path);
    info!(path = %shown, blocks = blocks.len(), "appended block");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Added block {} to {}",
        blocks.len(),
        shown
    )));
    Ok(result.with_blocks(blocks))
}
