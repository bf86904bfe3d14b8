use crate::commands::{helpers, CmdResult};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::tree::build_tree;

pub fn run(corpus: &Corpus, rel: &str) -> Result<CmdResult> {
    let dir = helpers::directory_path(corpus, rel)?;
    let tree = build_tree(corpus, &dir)?;
    Ok(CmdResult::default().with_tree(tree))
}
