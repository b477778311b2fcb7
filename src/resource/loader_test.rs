//! Tests for DefaultResourceLoader.

use super::*;
use crate::config::LoaderConfig;
use crate::error::CtxError;
use crate::fs::mock::MockFs;
use crate::fs::RealFs;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

fn mock_loader(files: &[(&str, &str)], config: LoaderConfig) -> DefaultResourceLoader {
    let fs = MockFs::new();
    for (path, content) in files {
        fs.add_file(path, content);
    }
    DefaultResourceLoader::new(Arc::new(fs), &config)
}

fn two_roots() -> LoaderConfig {
    LoaderConfig::default()
        .with_classpath_root("/first")
        .with_classpath_root("/second")
        .with_base_dir("/work")
}

fn descriptions(resources: &[Resource]) -> Vec<&str> {
    resources.iter().map(Resource::description).collect()
}

// ========================================
// classpath:
// ========================================

#[test]
fn classpath_searches_roots_in_order() {
    let loader = mock_loader(
        &[
            ("/first/app.xml", "first"),
            ("/second/app.xml", "second"),
            ("/second/only.xml", "only"),
        ],
        two_roots(),
    );

    let app = loader.resolve("classpath:app.xml").unwrap();
    assert_eq!(app.len(), 1);
    assert_eq!(app[0].content(), b"first");
    assert_eq!(app[0].description(), "class path resource [app.xml]");
    assert_eq!(app[0].origin(), &Origin::Classpath("app.xml".to_string()));

    let only = loader.resolve("classpath:/only.xml").unwrap();
    assert_eq!(only[0].path(), Some(PathBuf::from("/second/only.xml").as_path()));
}

#[test]
fn classpath_missing_resource_is_unresolvable() {
    let loader = mock_loader(&[], two_roots());
    let err = loader.resolve("classpath:missing.xml").unwrap_err();

    match err {
        CtxError::UnresolvableLocator { locator, reason } => {
            assert_eq!(locator, "classpath:missing.xml");
            assert!(reason.contains("/first"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn classpath_missing_resource_marks_absent_roots() {
    let loader = mock_loader(&[("/first/other.xml", "x")], two_roots());
    let err = loader.resolve("classpath:missing.xml").unwrap_err();

    let message = err.to_string();
    assert!(message.contains("[/first, /second (missing)]"), "{message}");
}

#[test]
fn classpath_without_roots_is_unresolvable() {
    let loader = mock_loader(&[("/first/app.xml", "x")], LoaderConfig::default());
    let err = loader.resolve("classpath:app.xml").unwrap_err();
    assert!(err.to_string().contains("no class path roots"));
}

#[test]
fn classpath_normalizes_dot_segments() {
    let loader = mock_loader(&[("/first/conf/app.xml", "x")], two_roots());
    let found = loader.resolve("classpath:conf/./sub/../app.xml").unwrap();
    assert_eq!(descriptions(&found), vec!["class path resource [conf/app.xml]"]);
}

#[test]
fn classpath_pattern_uses_first_matching_root() {
    let loader = mock_loader(
        &[
            ("/first/readme.txt", "x"),
            ("/second/beans/b.xml", "b"),
            ("/second/beans/a.xml", "a"),
            ("/second/beans/nested/c.xml", "c"),
        ],
        two_roots(),
    );

    let found = loader.resolve("classpath:beans/*.xml").unwrap();
    assert_eq!(
        descriptions(&found),
        vec![
            "class path resource [beans/a.xml]",
            "class path resource [beans/b.xml]"
        ]
    );
}

#[test]
fn classpath_pattern_without_matches_is_empty() {
    let loader = mock_loader(&[], two_roots());
    assert!(loader.resolve("classpath:beans/*.xml").unwrap().is_empty());
}

#[test]
fn unspecified_scheme_uses_default() {
    let files = [("/first/app.xml", "cp"), ("/work/app.xml", "file")];

    let classpath = mock_loader(&files, two_roots());
    assert_eq!(classpath.resolve("app.xml").unwrap()[0].content(), b"cp");

    let file = mock_loader(&files, two_roots().with_default_scheme(DefaultScheme::File));
    assert_eq!(file.resolve("app.xml").unwrap()[0].content(), b"file");
}

// ========================================
// file:
// ========================================

#[test]
fn file_relative_to_base_dir() {
    let loader = mock_loader(&[("/work/conf/app.xml", "x")], two_roots());

    let found = loader.resolve("file:conf/app.xml").unwrap();
    assert_eq!(descriptions(&found), vec!["file [/work/conf/app.xml]"]);
    assert_eq!(found[0].origin(), &Origin::File);
}

#[test]
fn file_absolute_path() {
    let loader = mock_loader(&[("/etc/app.xml", "x")], two_roots());
    let found = loader.resolve("file:///etc/app.xml").unwrap();
    assert_eq!(found[0].identity(), "/etc/app.xml");
}

#[test]
fn file_missing_is_unresolvable() {
    let loader = mock_loader(&[], two_roots());
    let err = loader.resolve("file:nope.xml").unwrap_err();
    assert!(matches!(err, CtxError::UnresolvableLocator { .. }));
    assert!(err.to_string().contains("/work/nope.xml] does not exist"));
}

#[test]
fn file_pointing_at_directory_is_not_regular_file() {
    let loader = mock_loader(&[("/work/conf/a.xml", "a")], two_roots());
    let err = loader.resolve("file:conf").unwrap_err();
    assert!(
        err.to_string().contains("/work/conf] is not a regular file"),
        "{err}"
    );
}

#[test]
fn file_pattern_lists_matches() {
    let loader = mock_loader(
        &[
            ("/work/conf/b.properties", "b"),
            ("/work/conf/a.properties", "a"),
            ("/work/conf/c.xml", "c"),
        ],
        two_roots(),
    );

    let found = loader.resolve("file:conf/*.properties").unwrap();
    assert_eq!(
        descriptions(&found),
        vec![
            "file [/work/conf/a.properties]",
            "file [/work/conf/b.properties]"
        ]
    );
}

#[test]
fn unsupported_scheme_is_rejected() {
    let loader = mock_loader(&[], two_roots());
    let err = loader.resolve("https://example.com/app.xml").unwrap_err();
    assert!(matches!(err, CtxError::UnsupportedScheme { .. }));
}

// ========================================
// Relative resolution
// ========================================

#[test]
fn relative_to_classpath_resource() {
    let loader = mock_loader(
        &[
            ("/first/app/main.xml", "main"),
            ("/second/app/data.xml", "data"),
            ("/second/shared.xml", "shared"),
        ],
        two_roots(),
    );
    let base = loader.resolve("classpath:app/main.xml").unwrap().remove(0);

    let sibling = loader.resolve_relative(&base, "data.xml").unwrap();
    assert_eq!(descriptions(&sibling), vec!["class path resource [app/data.xml]"]);

    let parent = loader.resolve_relative(&base, "../shared.xml").unwrap();
    assert_eq!(parent[0].content(), b"shared");
}

#[test]
fn relative_to_file_resource() {
    let loader = mock_loader(
        &[("/etc/app/main.xml", "main"), ("/etc/app/extra.xml", "extra")],
        two_roots(),
    );
    let base = loader.resolve("file:/etc/app/main.xml").unwrap().remove(0);

    let found = loader.resolve_relative(&base, "/extra.xml").unwrap();
    assert_eq!(found[0].path(), Some(PathBuf::from("/etc/app/extra.xml").as_path()));
}

#[test]
fn relative_with_scheme_resolves_absolutely() {
    let loader = mock_loader(
        &[("/first/app/main.xml", "main"), ("/work/other.xml", "other")],
        two_roots(),
    );
    let base = loader.resolve("classpath:app/main.xml").unwrap().remove(0);

    let found = loader.resolve_relative(&base, "file:other.xml").unwrap();
    assert_eq!(found[0].content(), b"other");
}

#[test]
fn relative_to_memory_resource_fails() {
    let loader = mock_loader(&[], two_roots());
    let base = Resource::from_bytes("inline", "");
    let err = loader.resolve_relative(&base, "other.xml").unwrap_err();
    assert!(matches!(err, CtxError::UnresolvableLocator { .. }));
}

// ========================================
// Real filesystem
// ========================================

#[test]
fn resolves_from_real_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("classes");
    fs::create_dir_all(root.join("beans")).unwrap();
    fs::write(root.join("beans/a.xml"), "<beans/>").unwrap();
    fs::write(root.join("beans/b.xml"), "<beans/>").unwrap();
    fs::create_dir_all(root.join("beans/dir.xml")).unwrap();

    let config = LoaderConfig::default()
        .with_classpath_root(&root)
        .with_base_dir(temp.path());
    let loader = DefaultResourceLoader::new(Arc::new(RealFs), &config);

    let found = loader.resolve("classpath:beans/*.xml").unwrap();
    assert_eq!(
        descriptions(&found),
        vec![
            "class path resource [beans/a.xml]",
            "class path resource [beans/b.xml]"
        ]
    );

    let single = loader.resolve("file:classes/beans/a.xml").unwrap();
    assert_eq!(single[0].contents_utf8().unwrap(), "<beans/>");
}
