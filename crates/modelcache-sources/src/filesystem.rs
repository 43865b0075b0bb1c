use std::io;
use std::path::PathBuf;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use modelcache::{CacheContents, CacheError, Source};

/// A model as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Human-readable model name.
    pub name: String,
}

/// A [`Source`] that loads models from a directory of JSON files.
///
/// The model with identifier `id` is expected at `<root>/<id>.json`. A
/// missing file maps to [`CacheError::NotFound`] and an unparseable one to
/// [`CacheError::Malformed`]; everything else the cache layer treats as
/// opaque.
#[derive(Debug, Clone)]
pub struct FilesystemSource {
    root: PathBuf,
}

impl FilesystemSource {
    /// Creates a source serving models from the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn model_path(&self, id: &str) -> Option<PathBuf> {
        // Identifiers map to file names. Anything that could navigate out
        // of the root directory is not a model we serve.
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return None;
        }
        Some(self.root.join(format!("{id}.json")))
    }
}

impl Source for FilesystemSource {
    type Item = Model;

    fn fetch<'a>(&'a self, id: &'a str) -> BoxFuture<'a, CacheContents<Model>> {
        Box::pin(async move {
            let Some(path) = self.model_path(id) else {
                return Err(CacheError::NotFound);
            };
            tracing::trace!("Loading model at path {}", path.display());

            let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => CacheError::NotFound,
                io::ErrorKind::PermissionDenied => CacheError::PermissionDenied(e.to_string()),
                _ => e.into(),
            })?;

            serde_json::from_slice(&bytes).map_err(|e| CacheError::Malformed(e.to_string()))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::Write;

    use super::*;

    fn write_model(dir: &std::path::Path, id: &str, contents: &[u8]) {
        let mut file = File::create(dir.join(format!("{id}.json"))).unwrap();
        file.write_all(contents).unwrap();
    }

    #[tokio::test]
    async fn test_loads_model_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), "resnet50-v2", br#"{"name": "lorem"}"#);

        let source = FilesystemSource::new(dir.path());
        let model = source.fetch("resnet50-v2").await.unwrap();
        assert_eq!(model.name, "lorem");
    }

    #[tokio::test]
    async fn test_missing_model_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let source = FilesystemSource::new(dir.path());
        assert_eq!(
            source.fetch("resnet50-v2").await.unwrap_err(),
            CacheError::NotFound
        );
    }

    #[tokio::test]
    async fn test_unparseable_model_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        write_model(dir.path(), "resnet50-v2", b"not json at all");

        let source = FilesystemSource::new(dir.path());
        assert!(matches!(
            source.fetch("resnet50-v2").await.unwrap_err(),
            CacheError::Malformed(_)
        ));
    }

    #[tokio::test]
    async fn test_rejects_escaping_identifiers() {
        let dir = tempfile::tempdir().unwrap();

        let source = FilesystemSource::new(dir.path().join("models"));
        for id in ["../secrets", "a/b", "a\\b", ""] {
            assert_eq!(source.fetch(id).await.unwrap_err(), CacheError::NotFound);
        }
    }
}
