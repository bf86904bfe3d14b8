use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const TYPE_KEY: &str = "type";
pub const CREATED_KEY: &str = "created";
pub const MODIFIED_KEY: &str = "modified";
pub const MARKDOWN_TYPE: &str = "markdown";

/// A header value. Headers are flat: nested values and nulls are not scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }
}

impl TryFrom<serde_json::Value> for Scalar {
    type Error = String;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Bool(b) => Ok(Scalar::Bool(b)),
            serde_json::Value::Number(n) => Ok(Scalar::Number(n)),
            serde_json::Value::String(s) => Ok(Scalar::String(s)),
            serde_json::Value::Null => Err("null is not a scalar value".to_string()),
            serde_json::Value::Array(_) => Err("arrays are not allowed in headers".to_string()),
            serde_json::Value::Object(_) => Err("nested maps are not allowed in headers".to_string()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Number(n.into())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::String(s) => write!(f, "{}", s),
        }
    }
}

pub type Metadata = BTreeMap<String, Scalar>;

/// One timestamped content unit inside a document.
///
/// Serializes flat (`{"content": ..., "type": ..., "created": ...}`), which is
/// the shape calling layers exchange with the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub content: String,
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl Block {
    pub fn new(content: impl AsRef<str>, metadata: Metadata) -> Self {
        Self {
            content: content.as_ref().trim().to_string(),
            metadata,
        }
    }

    /// A fresh markdown block whose `created` and `modified` are both `stamp`.
    pub fn markdown(content: impl AsRef<str>, stamp: &str) -> Self {
        let mut metadata = Metadata::new();
        metadata.insert(TYPE_KEY.to_string(), MARKDOWN_TYPE.into());
        metadata.insert(CREATED_KEY.to_string(), stamp.into());
        metadata.insert(MODIFIED_KEY.to_string(), stamp.into());
        Self::new(content, metadata)
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Scalar>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Scalar::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.meta_str(TYPE_KEY)
    }

    pub fn created(&self) -> Option<&str> {
        self.meta_str(CREATED_KEY)
    }

    pub fn modified(&self) -> Option<&str> {
        self.meta_str(MODIFIED_KEY)
    }
}

/// A filesystem entry in a directory tree, paths relative to the corpus root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryNode {
    pub path: String,
    pub name: String,
    pub is_dir: bool,
    #[serde(rename = "isImage")]
    pub is_image: bool,
    /// `None` for files, the (possibly empty) child list for directories.
    pub children: Option<Vec<DirectoryNode>>,
}

impl DirectoryNode {
    pub fn child_names(&self) -> Vec<&str> {
        self.children
            .as_ref()
            .map(|c| c.iter().map(|n| n.name.as_str()).collect())
            .unwrap_or_default()
    }
}

/// A block matched by a search, tagged with the document it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub content: String,
    #[serde(rename = "link")]
    pub path: String,
    #[serde(skip)]
    pub modified: String,
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// A stored upload and the corpus-relative URL it is reachable under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    pub url: String,
    #[serde(skip)]
    pub file_name: String,
}

/// Blocks created and modified on one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub created: usize,
    pub modified: usize,
}

/// Summary of one document's blocks in an activity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentActivity {
    pub link: String,
    pub blocks: usize,
    pub created_days: usize,
    pub modified_days: usize,
    pub last_modified: Option<String>,
}
