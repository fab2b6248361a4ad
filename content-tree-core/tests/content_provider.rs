use content_tree_core::content::{ContentProvider, FileContentProvider, TextContentProvider};
use content_tree_core::error::IndexError;
use content_tree_core::route::Route;
use std::fs::write;
use tempfile::tempdir;

#[tokio::test]
async fn test_file_provider_reads_lazily_and_rereads() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("index.md");
    let route = Route::from_request("docs");

    // Constructing the provider does not touch the file.
    let provider = FileContentProvider::new(&path, route.clone());
    write(&path, "# First").unwrap();
    assert_eq!(provider.data().await.unwrap(), b"# First");

    write(&path, "# Second").unwrap();
    assert_eq!(provider.data().await.unwrap(), b"# Second");
    assert_eq!(provider.route(), &route);
    assert_eq!(provider.path(), path.as_path());
}

#[tokio::test]
async fn test_file_provider_reports_io_errors() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("gone.md");
    let provider = FileContentProvider::new(&path, Route::from_request("gone"));

    let err = provider.data().await.unwrap_err();
    match err {
        IndexError::Io { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("Expected Io error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_text_provider_returns_its_content() {
    let route = Route::from_request("a/b");
    let provider = TextContentProvider::placeholder(std::path::Path::new("/repo/a/b"), route.clone());

    assert_eq!(provider.text(), "# b");
    assert_eq!(provider.data().await.unwrap(), b"# b");
    assert_eq!(provider.route(), &route);
}
