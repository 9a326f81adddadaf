// ABOUTME: Tests for DirectoryResolver discovery, filtering, ordering and errors
// ABOUTME: Builds throwaway cog trees in temp directories

use std::fs;
use tempfile::TempDir;
use tux_loader::testing::write_manifest;
use tux_loader::{DirectoryResolver, Resolve, ResolutionError, StaticResolver};

fn cog_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_manifest(root, "utility.ping", "").unwrap();
    write_manifest(root, "utility.help", "").unwrap();
    write_manifest(root, "admin", "").unwrap();
    write_manifest(root, "fun.games.dice", "").unwrap();

    // Not cogs
    fs::write(root.join("__init__.toml"), "").unwrap();
    fs::write(root.join("utility").join("_index.toml"), "").unwrap();
    fs::write(root.join("README.md"), "# cogs").unwrap();
    fs::write(root.join("utility").join("notes.txt"), "").unwrap();
    fs::write(root.join(".hidden.toml"), "").unwrap();
    fs::create_dir_all(root.join("_disabled")).unwrap();
    fs::write(root.join("_disabled").join("old.toml"), "").unwrap();
    dir
}

#[test]
fn test_resolves_only_qualifying_manifests_in_order() {
    let dir = cog_tree();
    let resolver = DirectoryResolver::new(dir.path());

    let names: Vec<_> = resolver
        .resolve()
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();

    assert_eq!(
        names,
        vec!["admin", "fun.games.dice", "utility.help", "utility.ping"]
    );
}

#[test]
fn test_resolution_is_deterministic_and_duplicate_free() {
    let dir = cog_tree();
    let resolver = DirectoryResolver::new(dir.path());

    let first = resolver.resolve().unwrap();
    let second = resolver.resolve().unwrap();
    assert_eq!(first, second);

    let mut names: Vec<_> = first.iter().map(|d| d.name.clone()).collect();
    names.dedup();
    assert_eq!(names.len(), first.len());
}

#[test]
fn test_descriptor_paths_point_at_manifests() {
    let dir = cog_tree();
    let descriptors = DirectoryResolver::new(dir.path()).resolve().unwrap();
    for descriptor in descriptors {
        assert!(descriptor.path.is_file(), "{:?}", descriptor.path);
        assert!(descriptor.path.starts_with(dir.path()));
    }
}

#[test]
fn test_missing_root_is_not_found() {
    let dir = TempDir::new().unwrap();
    let resolver = DirectoryResolver::new(dir.path().join("nope"));
    assert!(matches!(resolver.resolve(), Err(ResolutionError::NotFound(_))));
}

#[test]
fn test_file_root_is_not_a_directory() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("cogs.toml");
    fs::write(&file, "").unwrap();
    let resolver = DirectoryResolver::new(&file);
    assert!(matches!(
        resolver.resolve(),
        Err(ResolutionError::NotADirectory(_))
    ));
}

#[test]
fn test_empty_root_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("__init__.toml"), "").unwrap();
    fs::write(dir.path().join("README.md"), "").unwrap();

    let err = DirectoryResolver::new(dir.path()).resolve().unwrap_err();
    assert!(matches!(err, ResolutionError::Empty(_)));
    assert!(err.to_string().contains("contains no cog manifests"));
}

#[test]
fn test_find_single_cog() {
    let dir = cog_tree();
    let resolver = DirectoryResolver::new(dir.path());

    let found = resolver.find("utility.ping").unwrap();
    assert_eq!(found.name, "utility.ping");

    assert!(resolver.find("utility.missing").is_none());
    assert!(resolver.find("_disabled.old").is_none());
    assert!(resolver.find("").is_none());
    assert!(resolver.find("utility..ping").is_none());
}

#[test]
fn test_dotted_stems_are_skipped_not_merged() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_manifest(root, "a.b", "").unwrap();
    fs::write(root.join("a.b.toml"), "").unwrap();
    fs::create_dir_all(root.join("v1.2")).unwrap();
    fs::write(root.join("v1.2").join("ping.toml"), "").unwrap();

    let descriptors = DirectoryResolver::new(root).resolve().unwrap();

    assert_eq!(descriptors.len(), 1);
    assert_eq!(descriptors[0].name, "a.b");
    assert_eq!(descriptors[0].path, root.join("a").join("b.toml"));
}

#[test]
fn test_only_dotted_manifests_is_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("legacy.ping.toml"), "").unwrap();

    let err = DirectoryResolver::new(dir.path()).resolve().unwrap_err();
    assert!(matches!(err, ResolutionError::Empty(_)));
}

#[test]
fn test_find_never_leaves_the_root() {
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("evil.toml"), "").unwrap();
    let dir = cog_tree();
    let resolver = DirectoryResolver::new(dir.path());

    let absolute = outside.path().join("evil");
    assert!(resolver.find(absolute.to_str().unwrap()).is_none());
    assert!(resolver.find("utility/ping").is_none());
    assert!(resolver.find("../evil").is_none());
    assert!(resolver.find("utility.ping").is_some());
}

#[test]
fn test_static_resolver_keeps_given_order() {
    let resolver = StaticResolver::from_names(["c", "a", "b"]);
    let names: Vec<_> = resolver
        .resolve()
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["c", "a", "b"]);

    assert!(matches!(
        StaticResolver::default().resolve(),
        Err(ResolutionError::Empty(_))
    ));
}
