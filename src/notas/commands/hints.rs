use crate::commands::{helpers, CmdResult};
use crate::corpus::Corpus;
use crate::error::Result;

/// Flat, sorted listing of every path under a directory, for completion.
pub fn run(corpus: &Corpus, rel: &str) -> Result<CmdResult> {
    let dir = helpers::directory_path(corpus, rel)?;
    let paths = corpus
        .walk(&dir)?
        .into_iter()
        .map(|entry| entry.path)
        .collect();
    Ok(CmdResult::default().with_paths(paths))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotasConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn lists_directories_and_files_without_trash() {
        let dir = TempDir::new().unwrap();
        let corpus = Corpus::open(dir.path(), NotasConfig::default()).unwrap();
        fs::create_dir_all(corpus.root().join("b")).unwrap();
        fs::create_dir_all(corpus.trash_path()).unwrap();
        fs::write(corpus.root().join("b/x.md"), "").unwrap();
        fs::write(corpus.root().join("a.md"), "").unwrap();
        fs::write(corpus.trash_path().join("20240101-000000_z.md"), "").unwrap();

        let result = run(&corpus, "/").unwrap();
        assert_eq!(result.paths, vec!["/", "/a.md", "/b", "/b/x.md"]);

        let sub = run(&corpus, "/b").unwrap();
        assert_eq!(sub.paths, vec!["/b", "/b/x.md"]);
    }
}
