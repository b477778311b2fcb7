//! Tests for PropertiesDefinitionReader.

use super::properties::parse_properties;
use super::*;
use crate::definition::{PropertyValue, Scope};
use crate::error::CtxError;
use crate::registry::SimpleRegistry;

fn load(text: &str) -> Result<SimpleRegistry> {
    let mut registry = SimpleRegistry::new();
    PropertiesDefinitionReader::new()
        .load_definitions(&Resource::from_bytes("app.properties", text), &mut registry)?;
    Ok(registry)
}

fn value(s: &str) -> PropertyValue {
    PropertyValue::Value(s.to_string())
}

fn reference(s: &str) -> PropertyValue {
    PropertyValue::Ref(s.to_string())
}

// ========================================
// Text format
// ========================================

#[test]
fn parse_skips_comments_and_blank_lines() {
    let entries = parse_properties("# comment\n! also comment\n\n   \nkey=value\n").unwrap();
    assert_eq!(entries, vec![("key".to_string(), "value".to_string())]);
}

#[test]
fn parse_accepts_all_separators() {
    let entries = parse_properties("a=1\nb:2\nc 3\nd = 4\ne\n").unwrap();
    let keys: Vec<_> = entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(
        keys,
        vec![("a", "1"), ("b", "2"), ("c", "3"), ("d", "4"), ("e", "")]
    );
}

#[test]
fn parse_joins_continuation_lines() {
    let entries = parse_properties("list=a,\\\n     b,\\\n     c\nnext=x").unwrap();
    assert_eq!(entries[0], ("list".to_string(), "a,b,c".to_string()));
    assert_eq!(entries[1], ("next".to_string(), "x".to_string()));
}

#[test]
fn parse_even_backslashes_do_not_continue() {
    let entries = parse_properties("path=C:\\\\\nnext=x").unwrap();
    assert_eq!(entries[0].1, "C:\\");
    assert_eq!(entries.len(), 2);
}

#[test]
fn parse_handles_escapes() {
    let entries =
        parse_properties("key\\ with\\=sep=tab\\there\\u00e9\nunicode=\\u3042").unwrap();
    assert_eq!(entries[0].0, "key with=sep");
    assert_eq!(entries[0].1, "tab\there\u{e9}");
    assert_eq!(entries[1].1, "\u{3042}");
}

#[test]
fn parse_rejects_malformed_unicode_escape() {
    let err = parse_properties("a=ok\nb=\\u12").unwrap_err();
    assert!(err.starts_with("line 2:"), "{err}");
}

#[test]
fn parse_rejects_signed_unicode_escape() {
    let err = parse_properties("a=\\u+123").unwrap_err();
    assert!(err.contains("\\u+123"), "{err}");

    assert!(parse_properties("a=\\u-123").is_err());
}

#[test]
fn malformed_escape_is_reported_as_parse_error() {
    let err = load("a.(class)=\\uZZZZ").unwrap_err();
    assert!(matches!(err, CtxError::ResourceParse { ref resource, .. } if resource == "app.properties"));
}

// ========================================
// Definitions
// ========================================

#[test]
fn loads_definitions_in_first_appearance_order() {
    let registry = load(
        "repo.(class)=com.example.Repo\n\
         dataSource.(class)=com.example.DataSource\n\
         repo.url=jdbc:h2:mem:test\n",
    )
    .unwrap();

    assert_eq!(registry.definition_names(), vec!["repo", "dataSource"]);
    let repo = registry.definition("repo").unwrap();
    assert_eq!(repo.class_name.as_deref(), Some("com.example.Repo"));
    assert_eq!(repo.property("url"), Some(&value("jdbc:h2:mem:test")));
    assert_eq!(repo.source.as_deref(), Some("app.properties"));
}

#[test]
fn bean_name_is_everything_before_last_dot() {
    let registry = load("com.example.repo.(class)=Repo").unwrap();
    assert!(registry.contains_definition("com.example.repo"));
}

#[test]
fn keys_without_dot_are_ignored() {
    let registry = load("standalone=1\na.(class)=A").unwrap();
    assert_eq!(registry.definition_names(), vec!["a"]);
}

#[test]
fn reads_meta_attributes() {
    let registry = load(
        "a.(class)=A\n\
         a.(scope)=prototype\n\
         a.(lazy-init)=true\n\
         a.(primary)=true\n\
         a.(depends-on)=b,c\n\
         b.(class)=B\n\
         b.(singleton)=false\n\
         base.(abstract)=true\n\
         child.(parent)=base\n",
    )
    .unwrap();

    let a = registry.definition("a").unwrap();
    assert_eq!(a.scope, Scope::Prototype);
    assert!(a.lazy_init);
    assert!(a.primary);
    assert_eq!(a.depends_on, vec!["b", "c"]);

    assert_eq!(registry.definition("b").unwrap().scope, Scope::Prototype);
    assert!(registry.definition("base").unwrap().abstract_definition);
    assert_eq!(
        registry.definition("child").unwrap().parent.as_deref(),
        Some("base")
    );
}

#[test]
fn references_use_suffix_or_star_prefix() {
    let registry = load(
        "repo.(class)=Repo\n\
         repo.dataSource(ref)=dataSource\n\
         repo.cache=*cacheManager\n\
         repo.pattern=**.xml\n",
    )
    .unwrap();

    let repo = registry.definition("repo").unwrap();
    assert_eq!(repo.property("dataSource"), Some(&reference("dataSource")));
    assert_eq!(repo.property("cache"), Some(&reference("cacheManager")));
    assert_eq!(repo.property("pattern"), Some(&value("*.xml")));
}

#[test]
fn later_property_value_replaces_earlier() {
    let registry = load("a.(class)=A\na.x=1\na.x=2").unwrap();
    let a = registry.definition("a").unwrap();
    assert_eq!(a.properties.len(), 1);
    assert_eq!(a.property("x"), Some(&value("2")));
}

#[test]
fn constructor_args_are_sorted_by_index() {
    let registry = load("a.(class)=A\na.$1=second\na.$0=*first").unwrap();
    let args = &registry.definition("a").unwrap().constructor_args;

    assert_eq!(args.len(), 2);
    assert_eq!(args[0].index, Some(0));
    assert_eq!(args[0].value, reference("first"));
    assert_eq!(args[1].value, value("second"));
}

#[test]
fn non_numeric_constructor_index_is_rejected() {
    let err = load("a.(class)=A\na.$x=1").unwrap_err();
    assert!(err.to_string().contains("numeric index"));
}

#[test]
fn unknown_meta_attribute_is_rejected() {
    let err = load("a.(class)=A\na.(colour)=red").unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("(colour)"));
}

#[test]
fn invalid_boolean_is_rejected() {
    let err = load("a.(class)=A\na.(lazy-init)=maybe").unwrap_err();
    assert!(err.to_string().contains("true or false"));
}

#[test]
fn definition_without_class_or_parent_is_rejected() {
    let err = load("a.url=jdbc:h2:mem:test").unwrap_err();
    assert!(err.is_parse_error());
    assert!(err.to_string().contains("'a'"));
}

#[test]
fn empty_resource_loads_nothing() {
    assert_eq!(load("").unwrap().definition_count(), 0);
    assert_eq!(load("# only comments\n").unwrap().definition_count(), 0);
}

#[test]
fn conflicting_definition_fails_in_strict_registry() {
    let mut registry = SimpleRegistry::with_overriding(false);
    registry
        .register_definition("a", crate::definition::BeanDefinition::new().with_class("A"))
        .unwrap();

    let err = PropertiesDefinitionReader::new()
        .load_definitions(&Resource::from_bytes("b.properties", "a.(class)=B"), &mut registry)
        .unwrap_err();

    assert!(matches!(err, CtxError::DefinitionConflict { .. }));
}
