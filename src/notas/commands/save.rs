use crate::codec;
use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::model::Block;
use tracing::info;

/// Replaces the whole document with `blocks`.
pub fn run(corpus: &Corpus, rel: &str, blocks: Vec<Block>) -> Result<CmdResult> {
    let path = helpers::document_path(corpus, rel)?;
    codec::validate(&blocks)?;

    let text = codec::serialize(&blocks);
    corpus.write_atomic(&path, text.as_bytes())?;

    let shown = corpus.relative(&path);
    info!(path = %shown, blocks = blocks.len(), "saved document");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Saved {} block(s) to {}",
        blocks.len(),
        shown
    )));
    Ok(result.with_blocks(blocks))
}
