use crate::config::NotasConfig;
use crate::model::{Block, DayActivity, DirectoryNode, DocumentActivity, ImageAsset, SearchResult};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub mod activity;
pub mod append;
pub mod config;
pub mod create;
pub mod helpers;
pub mod hints;
pub mod image;
pub mod load;
pub mod save;
pub mod search;
pub mod trash;
pub mod tree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a command hands back to the calling layer. Only the fields relevant
/// to the command are populated.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub blocks: Vec<Block>,
    pub tree: Option<DirectoryNode>,
    pub paths: Vec<String>,
    pub search_results: Vec<SearchResult>,
    pub image: Option<ImageAsset>,
    pub activity: BTreeMap<NaiveDate, DayActivity>,
    pub documents: Vec<DocumentActivity>,
    pub config: Option<NotasConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn with_tree(mut self, tree: DirectoryNode) -> Self {
        self.tree = Some(tree);
        self
    }

    pub fn with_paths(mut self, paths: Vec<String>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_search_results(mut self, results: Vec<SearchResult>) -> Self {
        self.search_results = results;
        self
    }

    pub fn with_image(mut self, image: ImageAsset) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_activity(
        mut self,
        activity: BTreeMap<NaiveDate, DayActivity>,
        documents: Vec<DocumentActivity>,
    ) -> Self {
        self.activity = activity;
        self.documents = documents;
        self
    }

    pub fn with_config(mut self, config: NotasConfig) -> Self {
        self.config = Some(config);
        self
    }
}
