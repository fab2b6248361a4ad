use content_tree_core::error::IndexError;
use content_tree_core::route::Route;
use std::path::Path;

#[test]
fn test_from_item_path_uses_parent_directory_of_document() {
    let route = Route::from_item_path(Path::new("/repo"), Path::new("/repo/docs/intro/index.md"))
        .expect("Route should build");
    assert_eq!(route.segments(), &["docs".to_string(), "intro".to_string()]);
    assert_eq!(route.value(), "docs/intro");
    assert_eq!(route.pretty_value(), "/docs/intro");
}

#[test]
fn test_from_item_directory_of_root_is_root_route() {
    let route = Route::from_item_directory(Path::new("/repo"), Path::new("/repo"))
        .expect("Route should build");
    assert!(route.is_root());
    assert_eq!(route.value(), "");
    assert_eq!(route.pretty_value(), "/");
    assert_eq!(route.parent(), None);
}

#[test]
fn test_route_outside_root_is_rejected() {
    let err = Route::from_item_directory(Path::new("/repo"), Path::new("/elsewhere/docs"))
        .unwrap_err();
    assert!(
        matches!(err, IndexError::OutsideRoot { .. }),
        "Expected OutsideRoot, got: {err:?}"
    );

    let err = Route::from_item_path(Path::new("/repo"), Path::new("/repository/a.md")).unwrap_err();
    assert!(matches!(err, IndexError::OutsideRoot { .. }));
}

#[test]
fn test_file_route_keeps_file_name() {
    let route = Route::from_file_path(Path::new("/repo"), Path::new("/repo/a/files/pic.png"))
        .expect("Route should build");
    assert_eq!(route.value(), "a/files/pic.png");
    assert_eq!(route.to_string(), "a/files/pic.png");
}

#[test]
fn test_is_child_of_requires_proper_extension() {
    let theme = Route::from_request("theme");
    let css = Route::from_request("/theme/css/site.css");
    let themes = Route::from_request("themes/x");

    assert!(css.is_child_of(&theme));
    assert!(!theme.is_child_of(&theme), "A route is not its own child");
    assert!(!theme.is_child_of(&css));
    assert!(!themes.is_child_of(&theme), "Segment prefixes are not ancestry");
    assert!(theme.is_child_of(&Route::default()));
}

#[test]
fn test_routes_compare_by_segments() {
    let from_path = Route::from_item_directory(Path::new("/repo"), Path::new("/repo/a/b")).unwrap();
    let from_request = Route::from_request("//a/b/");
    assert_eq!(from_path, from_request);
    assert_ne!(from_request, Route::from_request("a/B"), "No case folding");
    assert_eq!(from_request.parent(), Some(Route::from_request("a")));
}
