use crate::error::{NotasError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DOC_EXT: &str = ".md";
const DEFAULT_TRASH_DIR: &str = "trash";
const DEFAULT_IMAGES_DIR: &str = "images";
const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DEFAULT_HASH_PREFIX_LEN: usize = 8;

/// Configuration for notas, stored in `<config dir>/config.json`.
///
/// The corpus root is deliberately not part of this file: it is passed to
/// [`crate::corpus::Corpus`] explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotasConfig {
    /// Extension identifying documents (e.g. ".md")
    #[serde(default = "default_doc_ext")]
    pub doc_ext: String,

    /// Name of the soft-delete directory at the corpus root
    #[serde(default = "default_trash_dir")]
    pub trash_dir: String,

    /// Name of the per-directory upload folder
    #[serde(default = "default_images_dir")]
    pub images_dir: String,

    /// Extensions (without dot) flagged as images in directory trees
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,

    /// chrono format of the `created`/`modified` header values
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// Hex digits of the content hash used in stored image names
    #[serde(default = "default_hash_prefix_len")]
    pub hash_prefix_len: usize,
}

fn default_doc_ext() -> String {
    DEFAULT_DOC_EXT.to_string()
}

fn default_trash_dir() -> String {
    DEFAULT_TRASH_DIR.to_string()
}

fn default_images_dir() -> String {
    DEFAULT_IMAGES_DIR.to_string()
}

fn default_image_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "gif", "webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_hash_prefix_len() -> usize {
    DEFAULT_HASH_PREFIX_LEN
}

impl Default for NotasConfig {
    fn default() -> Self {
        Self {
            doc_ext: default_doc_ext(),
            trash_dir: default_trash_dir(),
            images_dir: default_images_dir(),
            image_extensions: default_image_extensions(),
            timestamp_format: default_timestamp_format(),
            hash_prefix_len: default_hash_prefix_len(),
        }
    }
}

impl NotasConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| NotasError::io(CONFIG_FILENAME, e))?;
        let mut config: NotasConfig = serde_json::from_str(&content)?;
        config.normalize()?;
        Ok(config)
    }

    /// Applies the rules `set` enforces to values read from disk.
    fn normalize(&mut self) -> Result<()> {
        self.doc_ext = normalize_ext(&self.doc_ext);
        self.trash_dir = single_component("trash-dir", &self.trash_dir)?;
        self.images_dir = single_component("images-dir", &self.images_dir)?;
        self.image_extensions = parse_extensions(&self.image_extensions.join(","));
        check_hash_prefix_len("hash-prefix-len", self.hash_prefix_len)?;
        if self.timestamp_format.trim().is_empty() {
            return Err(NotasError::InvalidInput(
                "timestamp-format must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(|e| NotasError::io(CONFIG_FILENAME, e))?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).map_err(|e| NotasError::io(CONFIG_FILENAME, e))?;
        Ok(())
    }

    /// Set the document extension (normalizes to start with a dot)
    pub fn set_doc_ext(&mut self, ext: &str) {
        self.doc_ext = normalize_ext(ext);
    }

    /// Sets a key by its CLI name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "doc-ext" => self.set_doc_ext(value),
            "trash-dir" => self.trash_dir = single_component(key, value)?,
            "images-dir" => self.images_dir = single_component(key, value)?,
            "image-extensions" => self.image_extensions = parse_extensions(value),
            "timestamp-format" => {
                if value.trim().is_empty() {
                    return Err(NotasError::InvalidInput(format!("{} must not be empty", key)));
                }
                self.timestamp_format = value.to_string()
            }
            "hash-prefix-len" => {
                let len: usize = value.parse().map_err(|_| {
                    NotasError::InvalidInput(format!("{} must be a number, got {:?}", key, value))
                })?;
                self.hash_prefix_len = check_hash_prefix_len(key, len)?;
            }
            other => {
                return Err(NotasError::InvalidInput(format!(
                    "Unknown config key: {}",
                    other
                )))
            }
        }
        Ok(())
    }

    /// Reads a key by its CLI name.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "doc-ext" => Some(self.doc_ext.clone()),
            "trash-dir" => Some(self.trash_dir.clone()),
            "images-dir" => Some(self.images_dir.clone()),
            "image-extensions" => Some(self.image_extensions.join(",")),
            "timestamp-format" => Some(self.timestamp_format.clone()),
            "hash-prefix-len" => Some(self.hash_prefix_len.to_string()),
            _ => None,
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "doc-ext",
            "trash-dir",
            "images-dir",
            "image-extensions",
            "timestamp-format",
            "hash-prefix-len",
        ]
    }
}

fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}

fn parse_extensions(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_start_matches('.').to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// A SHA-1 digest has 40 hex digits.
fn check_hash_prefix_len(key: &str, len: usize) -> Result<usize> {
    if (1..=40).contains(&len) {
        Ok(len)
    } else {
        Err(NotasError::InvalidInput(format!(
            "{} must be between 1 and 40, got {}",
            key, len
        )))
    }
}

fn single_component(key: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() || value.contains('/') || value.contains('\\') || value == "." || value == ".." {
        return Err(NotasError::InvalidInput(format!(
            "{} must be a plain directory name, got {:?}",
            key, value
        )));
    }
    Ok(value.to_string())
}
