use crate::codec;
use crate::commands::{helpers, CmdMessage, CmdResult};
use crate::corpus::Corpus;
use crate::error::Result;
use tracing::{debug, info};

/// Reads a document's blocks, creating the document empty if it is missing.
pub fn run(corpus: &Corpus, rel: &str) -> Result<CmdResult> {
    let path = helpers::document_path(corpus, rel)?;
    let mut result = CmdResult::default();

    if corpus.create_empty(&path)? {
        info!(path = %rel, "created empty document");
        result.add_message(CmdMessage::info(format!(
            "Created empty document {}",
            corpus.relative(&path)
        )));
    }

    let text = corpus.read_document(&path)?;
    let blocks = codec::parse(&text)?;
    debug!(path = %rel, blocks = blocks.len(), "loaded document");
    Ok(result.with_blocks(blocks))
}
