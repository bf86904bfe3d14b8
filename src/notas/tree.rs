//! Nested directory views built from a flat corpus walk.
//!
//! The walk is sorted by path, so every directory comes before its
//! descendants. Folding the entries in reverse therefore finishes each
//! subtree before its parent is reached, without recursing.

use crate::corpus::{Corpus, CorpusEntry};
use crate::error::{NotasError, Result};
use crate::model::DirectoryNode;
use std::collections::HashMap;
use std::path::Path;

/// Builds the tree under `dir`. Directories are listed before files, each
/// group by ascending name.
///
/// `dir` must be an existing directory: falling back to an ancestor is the
/// caller's decision.
pub fn build_tree(corpus: &Corpus, dir: &Path) -> Result<DirectoryNode> {
    let top = corpus.relative(dir);
    if !dir.is_dir() {
        return Err(NotasError::InvalidPath(format!(
            "{} is not a directory",
            top
        )));
    }

    let entries = corpus.walk(dir)?;
    let mut nodes: HashMap<String, DirectoryNode> = entries
        .iter()
        .map(|entry| (entry.path.clone(), leaf(corpus, entry)))
        .collect();

    for entry in entries.iter().rev() {
        if entry.path == top {
            continue;
        }
        let Some(mut node) = nodes.remove(&entry.path) else {
            continue;
        };
        sort_children(&mut node);
        if let Some(parent) = nodes.get_mut(parent_of(&entry.path)) {
            parent.children.get_or_insert_with(Vec::new).push(node);
        }
    }

    let mut root = nodes
        .remove(&top)
        .ok_or_else(|| NotasError::InvalidPath(format!("{} is not part of the corpus", top)))?;
    sort_children(&mut root);
    Ok(root)
}

fn leaf(corpus: &Corpus, entry: &CorpusEntry) -> DirectoryNode {
    let name = match entry.name() {
        "" => "/".to_string(),
        name => name.to_string(),
    };
    DirectoryNode {
        is_image: !entry.is_dir && corpus.is_image(Path::new(&name)),
        path: entry.path.clone(),
        name,
        is_dir: entry.is_dir,
        children: if entry.is_dir { Some(Vec::new()) } else { None },
    }
}

fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "/",
    }
}

fn sort_children(node: &mut DirectoryNode) {
    if let Some(children) = node.children.as_mut() {
        children.sort_by(|a, b| (!a.is_dir, &a.name).cmp(&(!b.is_dir, &b.name)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotasConfig;
    use std::fs;
    use tempfile::TempDir;

    fn setup(files: &[&str]) -> (TempDir, Corpus) {
        let dir = TempDir::new().unwrap();
        let corpus = Corpus::open(dir.path(), NotasConfig::default()).unwrap();
        for rel in files {
            let path = corpus.root().join(rel);
            if rel.ends_with('/') {
                fs::create_dir_all(path).unwrap();
            } else {
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, "").unwrap();
            }
        }
        (dir, corpus)
    }

    #[test]
    fn directories_sort_before_files() {
        let (_dir, corpus) = setup(&["b.md", "A/", "a.md"]);
        let tree = build_tree(&corpus, corpus.root()).unwrap();

        assert_eq!(tree.path, "/");
        assert!(tree.is_dir);
        assert_eq!(tree.child_names(), vec!["A", "a.md", "b.md"]);
    }

    #[test]
    fn nests_subdirectories_with_corpus_paths() {
        let (_dir, corpus) = setup(&["work/z.md", "work/2024/jan.md", "work/images/p.png", "top.md"]);
        let tree = build_tree(&corpus, corpus.root()).unwrap();

        assert_eq!(tree.child_names(), vec!["work", "top.md"]);
        let work = &tree.children.as_ref().unwrap()[0];
        assert_eq!(work.path, "/work");
        assert_eq!(work.child_names(), vec!["2024", "images", "z.md"]);

        let images = &work.children.as_ref().unwrap()[1];
        let png = &images.children.as_ref().unwrap()[0];
        assert_eq!(png.path, "/work/images/p.png");
        assert!(png.is_image);
        assert!(png.children.is_none());

        let jan = &work.children.as_ref().unwrap()[0].children.as_ref().unwrap()[0];
        assert_eq!(jan.path, "/work/2024/jan.md");
        assert!(!jan.is_image);
    }

    #[test]
    fn excludes_trash_at_root() {
        let (_dir, corpus) = setup(&["trash/20240101-000000_a.md", "keep.md", "empty/"]);
        let tree = build_tree(&corpus, corpus.root()).unwrap();

        assert_eq!(tree.child_names(), vec!["empty", "keep.md"]);
        let empty = &tree.children.as_ref().unwrap()[0];
        assert_eq!(empty.children, Some(Vec::new()));
    }

    #[test]
    fn subtree_is_rooted_at_requested_directory() {
        let (_dir, corpus) = setup(&["a/b/c.md", "a/d.md", "x.md"]);
        let dir = corpus.resolve("/a").unwrap();
        let tree = build_tree(&corpus, &dir).unwrap();

        assert_eq!(tree.name, "a");
        assert_eq!(tree.child_names(), vec!["b", "d.md"]);
    }

    #[test]
    fn rejects_files() {
        let (_dir, corpus) = setup(&["n.md"]);
        let file = corpus.resolve("/n.md").unwrap();
        assert!(matches!(
            build_tree(&corpus, &file),
            Err(NotasError::InvalidPath(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directories_are_not_listed() {
        let (_dir, corpus) = setup(&["real/n.md"]);
        std::os::unix::fs::symlink(corpus.root().join("real"), corpus.root().join("alias"))
            .unwrap();
        let tree = build_tree(&corpus, corpus.root()).unwrap();

        assert_eq!(tree.child_names(), vec!["real"]);
    }

    #[test]
    fn parent_of_paths() {
        assert_eq!(parent_of("/a"), "/");
        assert_eq!(parent_of("/a/b"), "/a");
        assert_eq!(parent_of("/a/b/c.md"), "/a/b");
    }
}
