#![doc = "content-tree-core: indexing logic for content-tree."]

//! This crate turns a directory tree on disk into a hierarchical catalog of
//! content items and publishes them, one event per directory, on an
//! asynchronous stream.
//!
//! # Usage
//! Build an [`config::IndexerRules`] from an [`config::IndexerConfig`], open a
//! [`repository::Repository`] with it and drain [`repository::Repository::items`].
//! Collect the results into an [`index::ItemIndex`] to resolve routes.

pub mod classify;
pub mod config;
pub mod content;
pub mod error;
pub mod event;
pub mod files;
pub mod index;
pub mod item;
pub mod repository;
pub mod route;

pub use config::{IndexerConfig, IndexerRules};
pub use content::{ContentProvider, FileContentProvider, TextContentProvider};
pub use error::{IndexError, Result};
pub use event::{EventSink, ItemStream, RepositoryEvent};
pub use files::File;
pub use index::ItemIndex;
pub use item::{Item, ItemKind};
pub use repository::Repository;
pub use route::Route;
