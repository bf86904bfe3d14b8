//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for calling layers (the CLI here; an HTTP adapter would sit in
//! the same place).
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*::run`
//! - **Supplies the clock**, so commands stay deterministic under test
//! - **Falls back** to the nearest existing directory for directory-scoped
//!   operations (tree, hints, search, activity), the way a browser URL that
//!   points at a document still lists its folder
//!
//! It never prints and never decides status codes; errors come back as
//! [`crate::error::NotasError`] for the caller to map.

use crate::commands::{self, config::ConfigAction, CmdResult};
use crate::corpus::Corpus;
use crate::error::Result;
use crate::model::Block;
use chrono::Local;
use std::path::PathBuf;
use tracing::debug;

pub struct NotasApi {
    corpus: Corpus,
    config_dir: PathBuf,
}

impl NotasApi {
    pub fn new(corpus: Corpus, config_dir: PathBuf) -> Self {
        Self { corpus, config_dir }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn load_document(&self, path: &str) -> Result<CmdResult> {
        commands::load::run(&self.corpus, path)
    }

    pub fn save_document(&self, path: &str, blocks: Vec<Block>) -> Result<CmdResult> {
        commands::save::run(&self.corpus, path, blocks)
    }

    pub fn append_block(&self, path: &str, content: &str) -> Result<CmdResult> {
        commands::append::run(&self.corpus, path, content, Local::now().naive_local())
    }

    pub fn create_entry(&self, path: &str, name: &str) -> Result<CmdResult> {
        commands::create::run(&self.corpus, path, name)
    }

    pub fn tree(&self, path: &str) -> Result<CmdResult> {
        let dir = self.directory_for(path)?;
        commands::tree::run(&self.corpus, &dir)
    }

    pub fn hints(&self, path: &str) -> Result<CmdResult> {
        let dir = self.directory_for(path)?;
        commands::hints::run(&self.corpus, &dir)
    }

    pub fn search(&self, path: &str, query: &str) -> Result<CmdResult> {
        let dir = self.directory_for(path)?;
        commands::search::run(&self.corpus, &dir, query)
    }

    pub fn activity(&self, path: &str) -> Result<CmdResult> {
        let dir = self.directory_for(path)?;
        commands::activity::run(&self.corpus, &dir)
    }

    pub fn trash(&self, path: &str) -> Result<CmdResult> {
        commands::trash::run(&self.corpus, path, Local::now().naive_local())
    }

    pub fn store_image(&self, path: &str, bytes: &[u8], file_name: &str) -> Result<CmdResult> {
        commands::image::run(
            &self.corpus,
            path,
            bytes,
            file_name,
            Local::now().date_naive(),
        )
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.config_dir, action)
    }

    fn directory_for(&self, path: &str) -> Result<String> {
        let dir = self.corpus.nearest_directory(path)?;
        let rel = self.corpus.relative(&dir);
        if rel != path {
            debug!(requested = %path, using = %rel, "fell back to nearest directory");
        }
        Ok(rel)
    }
}
