//! End-to-end behavior of a [`ModelCache`] over a [`FilesystemSource`].

use std::fs;

use modelcache::{CacheError, ModelCache, test};
use modelcache_sources::FilesystemSource;

#[tokio::test]
async fn test_cached_model_survives_file_deletion() {
    test::setup();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resnet50-v2.json");
    fs::write(&path, br#"{"name": "lorem"}"#).unwrap();

    let cache = ModelCache::new(FilesystemSource::new(dir.path()));

    let model = cache.fetch("resnet50-v2").await.unwrap();
    assert_eq!(model.name, "lorem");

    // The file is gone, but the cache keeps serving the loaded model until
    // it is invalidated.
    fs::remove_file(&path).unwrap();
    let model = cache.fetch("resnet50-v2").await.unwrap();
    assert_eq!(model.name, "lorem");

    cache.invalidate("resnet50-v2").await;
    assert_eq!(
        cache.fetch("resnet50-v2").await.unwrap_err(),
        CacheError::NotFound
    );
}

#[tokio::test]
async fn test_fetches_again_once_the_model_appears() {
    test::setup();

    let dir = tempfile::tempdir().unwrap();
    let cache = ModelCache::new(FilesystemSource::new(dir.path()));

    // Failures are not cached, so the model becomes fetchable as soon as
    // the file shows up.
    assert_eq!(
        cache.fetch("resnet50-v2").await.unwrap_err(),
        CacheError::NotFound
    );

    fs::write(
        dir.path().join("resnet50-v2.json"),
        br#"{"name": "lorem"}"#,
    )
    .unwrap();

    let model = cache.fetch("resnet50-v2").await.unwrap();
    assert_eq!(model.name, "lorem");
}
