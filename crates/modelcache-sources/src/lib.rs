//! Concrete [`Source`](modelcache::Source) implementations.
//!
//! In practice models live somewhere slow: a directory on disk, an object
//! store bucket, a registry behind HTTP. This crate collects the source
//! implementations shipped alongside the cache. Currently that is the
//! filesystem-backed [`FilesystemSource`].

mod filesystem;

pub use filesystem::{FilesystemSource, Model};
