//! Corpus-wide block search.
//!
//! There is no index: every query walks the subtree and parses every
//! document it finds, so cost grows with the size of the corpus. That is the
//! intended trade-off for a personal notes directory.

use crate::codec;
use crate::commands::{helpers, CmdResult};
use crate::corpus::Corpus;
use crate::error::{NotasError, Result};
use crate::model::SearchResult;
use chrono::NaiveDateTime;
use std::path::Path;
use tracing::{debug, warn};

/// Blocks under `rel` whose content or document path contains `query`
/// (case-insensitive), newest `modified` first. An empty query matches
/// every block.
///
/// A matched block whose `modified` value does not parse fails the query.
pub fn run(corpus: &Corpus, rel: &str, query: &str) -> Result<CmdResult> {
    let dir = helpers::directory_path(corpus, rel)?;
    let format = &corpus.config().timestamp_format;

    let mut ordered: Vec<(NaiveDateTime, SearchResult)> = Vec::new();
    for result in scan(corpus, &dir, query)? {
        let stamp = NaiveDateTime::parse_from_str(&result.modified, format).map_err(|_| {
            NotasError::TimestampParse {
                path: result.path.clone(),
                value: result.modified.clone(),
            }
        })?;
        ordered.push((stamp, result));
    }
    ordered.sort_by(|a, b| b.0.cmp(&a.0));

    let results: Vec<SearchResult> = ordered.into_iter().map(|(_, r)| r).collect();
    debug!(query = %query, matches = results.len(), "search finished");
    Ok(CmdResult::default().with_search_results(results))
}

/// Matching blocks under `dir` in walk order, without any ordering by time.
pub fn scan(corpus: &Corpus, dir: &Path, query: &str) -> Result<Vec<SearchResult>> {
    let needle = query.to_lowercase();
    let mut results = Vec::new();

    for entry in corpus.walk(dir)? {
        if entry.is_dir || !corpus.is_document(Path::new(&entry.path)) {
            continue;
        }
        let path = corpus.resolve(&entry.path)?;
        let text = match corpus.read_document(&path) {
            Ok(text) => text,
            Err(e) if e.is_not_found() => {
                warn!(path = %entry.path, "document vanished during search");
                continue;
            }
            Err(e) => return Err(e),
        };
        let blocks = codec::parse(&text).map_err(|e| {
            warn!(path = %entry.path, "document has a malformed block header");
            e
        })?;

        let path_matches = entry.path.to_lowercase().contains(&needle);
        for block in blocks {
            if path_matches || block.content.to_lowercase().contains(&needle) {
                results.push(SearchResult {
                    modified: block.modified().unwrap_or_default().to_string(),
                    content: block.content,
                    path: entry.path.clone(),
                    metadata: block.metadata,
                });
            }
        }
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotasConfig;
    use crate::model::{Block, MODIFIED_KEY};
    use std::fs;
    use tempfile::TempDir;

    fn block(content: &str, modified: &str) -> Block {
        Block::markdown(content, "2024-01-01 00:00:00").with_meta(MODIFIED_KEY, modified)
    }

    fn write(corpus: &Corpus, rel: &str, blocks: &[Block]) {
        let path = corpus.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, codec::serialize(blocks)).unwrap();
    }

    fn contents(result: &CmdResult) -> Vec<&str> {
        result
            .search_results
            .iter()
            .map(|r| r.content.as_str())
            .collect()
    }

    fn setup() -> (TempDir, Corpus) {
        let dir = TempDir::new().unwrap();
        let corpus = Corpus::open(dir.path(), NotasConfig::default()).unwrap();
        (dir, corpus)
    }

    #[test]
    fn empty_query_lists_newest_first() {
        let (_dir, corpus) = setup();
        write(
            &corpus,
            "n.md",
            &[
                block("Hello", "2024-01-02 00:00:00"),
                block("World", "2024-01-03 00:00:00"),
            ],
        );

        let result = run(&corpus, "/", "").unwrap();
        assert_eq!(contents(&result), vec!["World", "Hello"]);
        assert_eq!(result.search_results[0].path, "/n.md");
        assert_eq!(result.search_results[0].modified, "2024-01-03 00:00:00");
    }

    #[test]
    fn matches_content_or_path_case_insensitively() {
        let (_dir, corpus) = setup();
        write(
            &corpus,
            "ideas.md",
            &[
                block("a TEST of things", "2024-01-01 10:00:00"),
                block("unrelated", "2024-01-05 10:00:00"),
            ],
        );
        write(
            &corpus,
            "testing/log.md",
            &[block("anything at all", "2024-01-02 10:00:00")],
        );
        write(
            &corpus,
            "other.md",
            &[block("nothing here", "2024-01-09 10:00:00")],
        );

        let result = run(&corpus, "/", "test").unwrap();
        assert_eq!(contents(&result), vec!["anything at all", "a TEST of things"]);
    }

    #[test]
    fn skips_trash_and_non_documents() {
        let (_dir, corpus) = setup();
        write(&corpus, "trash/20240101-000000_gone.md", &[block("gone", "2024-01-01 00:00:00")]);
        write(&corpus, "keep.md", &[block("kept", "2024-01-01 00:00:00")]);
        fs::write(
            corpus.root().join("raw.txt"),
            codec::serialize(&[block("raw", "2024-01-01 00:00:00")]),
        )
        .unwrap();

        let result = run(&corpus, "/", "").unwrap();
        assert_eq!(contents(&result), vec!["kept"]);
    }

    #[test]
    fn searches_only_the_requested_subtree() {
        let (_dir, corpus) = setup();
        write(&corpus, "a/x.md", &[block("in a", "2024-01-01 00:00:00")]);
        write(&corpus, "b/y.md", &[block("in b", "2024-01-01 00:00:00")]);

        let result = run(&corpus, "/a", "").unwrap();
        assert_eq!(contents(&result), vec!["in a"]);
        assert_eq!(result.search_results[0].path, "/a/x.md");
    }

    #[test]
    fn bad_timestamp_on_match_fails_query() {
        let (_dir, corpus) = setup();
        write(&corpus, "n.md", &[block("dated", "21/11/2025, 23:17:50")]);

        match run(&corpus, "/", "") {
            Err(NotasError::TimestampParse { path, value }) => {
                assert_eq!(path, "/n.md");
                assert_eq!(value, "21/11/2025, 23:17:50");
            }
            other => panic!("expected timestamp failure, got {:?}", other),
        }
    }

    #[test]
    fn bad_timestamp_outside_matches_is_ignored() {
        let (_dir, corpus) = setup();
        write(
            &corpus,
            "n.md",
            &[
                block("dated", "not a date"),
                block("findme", "2024-01-01 00:00:00"),
            ],
        );

        let result = run(&corpus, "/", "findme").unwrap();
        assert_eq!(contents(&result), vec!["findme"]);
    }

    #[test]
    fn missing_modified_fails_when_matched() {
        let (_dir, corpus) = setup();
        let undated = Block::new("undated", Default::default());
        write(&corpus, "n.md", &[undated]);

        assert!(matches!(
            run(&corpus, "/", ""),
            Err(NotasError::TimestampParse { .. })
        ));
    }

    #[test]
    fn malformed_document_fails_query() {
        let (_dir, corpus) = setup();
        fs::write(corpus.root().join("bad.md"), "<!-- nope -->x<!-- end -->").unwrap();
        assert!(matches!(
            run(&corpus, "/", ""),
            Err(NotasError::MalformedHeader { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn escaping_symlink_does_not_abort_search() {
        let (_dir, corpus) = setup();
        let outside = TempDir::new().unwrap();
        let secret = outside.path().join("secret.md");
        fs::write(&secret, codec::serialize(&[block("secret", "2024-01-09 00:00:00")])).unwrap();
        std::os::unix::fs::symlink(&secret, corpus.root().join("link.md")).unwrap();
        write(&corpus, "keep.md", &[block("kept", "2024-01-01 00:00:00")]);

        let result = run(&corpus, "/", "").unwrap();
        assert_eq!(contents(&result), vec!["kept"]);
    }
}
