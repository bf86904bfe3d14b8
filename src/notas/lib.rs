//! # Notas Architecture
//!
//! Notas keeps short notes as plain markdown files made of independently
//! timestamped **blocks**. The library parses, re-serializes, indexes and
//! searches a directory of such files; the binary is one thin client of it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, prints JSON and messages, exit codes   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade: clock, directory fallback, dispatch         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One operation per module, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Primitives                                                 │
//! │  - codec (block format), corpus (root, walk, atomic IO),    │
//! │    tree (directory index)                                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## On-disk layout
//!
//! ```text
//! notas/
//! ├── inbox.md                 # a document: a sequence of blocks
//! ├── work/
//! │   ├── plan.md
//! │   └── images/              # uploads, named <sha1 prefix>_<date>_<name>
//! └── trash/                   # soft-deleted entries, <stamp>_<name>
//! ```
//!
//! The trash directory never shows up in trees, hint listings or search.
//!
//! ## Paths and roots
//!
//! The corpus root is passed explicitly to [`corpus::Corpus::open`]; there is
//! no process-wide root. All paths crossing the API are corpus-relative
//! (`/work/plan.md`) and anything resolving outside the root is rejected with
//! [`error::NotasError::InvalidPath`].
//!
//! ## Concurrency
//!
//! Everything is synchronous and unlocked. Saves go through a temp file and
//! a rename, so readers never see a half-written document, but two saves to
//! the same document race and the last rename wins. Walks and searches may
//! observe entries being trashed or rewritten underneath them; entries that
//! vanish mid-scan are skipped.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`codec`]: Block format parser and serializer
//! - [`corpus`]: Root containment, corpus walk, document IO
//! - [`tree`]: Directory tree index
//! - [`model`]: Core data types (`Block`, `DirectoryNode`, `SearchResult`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod tree;
