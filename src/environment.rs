//! プレースホルダー解決
//!
//! ロケーション中の `${name}` / `${name:default}` を置換する。
//! 検索順: 明示プロパティ → プロセス環境変数 → インラインのデフォルト値

use crate::env::EnvVar;
use crate::error::{CtxError, Result};
use std::collections::BTreeMap;

/// プレースホルダーの値を提供する環境
#[derive(Debug, Clone)]
pub struct Environment {
    properties: BTreeMap<String, String>,
    use_process_env: bool,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            properties: BTreeMap::new(),
            use_process_env: true,
        }
    }

    /// プロセス環境変数を参照しない環境（テスト用）
    pub fn isolated() -> Self {
        Self {
            properties: BTreeMap::new(),
            use_process_env: false,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(key, value);
        self
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.properties.extend(entries);
    }

    pub fn property(&self, key: &str) -> Option<String> {
        if let Some(value) = self.properties.get(key) {
            return Some(value.clone());
        }
        if self.use_process_env {
            return EnvVar::get(key);
        }
        None
    }

    /// すべてのプレースホルダーを解決
    ///
    /// 値が見つからず、デフォルトもなければ Err。置換後の値に含まれる
    /// プレースホルダーも解決し、循環参照は Err。
    pub fn resolve_placeholders(&self, value: &str) -> Result<String> {
        let mut visiting = Vec::new();
        self.resolve_nested(value, value, &mut visiting)
    }

    fn resolve_nested(
        &self,
        original: &str,
        value: &str,
        visiting: &mut Vec<String>,
    ) -> Result<String> {
        let mut resolved = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            resolved.push_str(&rest[..start]);
            let body_start = start + 2;

            // 閉じていない `${` はそのまま残す
            let Some(len) = closing_brace(&rest[body_start..]) else {
                resolved.push_str(&rest[start..]);
                return Ok(resolved);
            };
            let body = &rest[body_start..body_start + len];
            let literal = &rest[start..body_start + len + 1];
            rest = &rest[body_start + len + 1..];

            let (key, default) = match body.split_once(':') {
                Some((key, default)) => (key.trim(), Some(default)),
                None => (body.trim(), None),
            };
            if key.is_empty() {
                resolved.push_str(literal);
                continue;
            }

            if visiting.iter().any(|k| k == key) {
                return Err(CtxError::Configuration(format!(
                    "circular placeholder reference '{}' in '{}'",
                    key, original
                )));
            }

            let raw = match (self.property(key), default) {
                (Some(found), _) => found,
                (None, Some(fallback)) => fallback.to_string(),
                (None, None) => {
                    return Err(CtxError::UnresolvedPlaceholder {
                        placeholder: key.to_string(),
                        value: original.to_string(),
                    })
                }
            };

            visiting.push(key.to_string());
            let expanded = self.resolve_nested(original, &raw, visiting)?;
            visiting.pop();

            resolved.push_str(&expanded);
        }

        resolved.push_str(rest);
        Ok(resolved)
    }
}

/// `${` の直後から対応する `}` の位置を探す（入れ子の `${...}` を考慮）
fn closing_brace(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
                continue;
            }
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn resolves_explicit_property() {
        let env = Environment::isolated().with_property("env", "dev");
        assert_eq!(
            env.resolve_placeholders("classpath:app-${env}.xml").unwrap(),
            "classpath:app-dev.xml"
        );
    }

    #[test]
    fn uses_inline_default() {
        let env = Environment::isolated();
        assert_eq!(
            env.resolve_placeholders("conf/${profile:default}/beans.xml")
                .unwrap(),
            "conf/default/beans.xml"
        );
        assert_eq!(env.resolve_placeholders("${empty:}x").unwrap(), "x");
    }

    #[test]
    fn missing_placeholder_is_error() {
        let env = Environment::isolated();
        let err = env.resolve_placeholders("app-${env}.xml").unwrap_err();

        assert!(err.is_configuration_error());
        assert!(matches!(
            err,
            CtxError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "env"
        ));
    }

    #[test]
    fn resolves_nested_values() {
        let env = Environment::isolated()
            .with_property("root", "conf/${env}")
            .with_property("env", "prod");
        assert_eq!(
            env.resolve_placeholders("file:${root}/a.xml").unwrap(),
            "file:conf/prod/a.xml"
        );
    }

    #[test]
    fn detects_circular_reference() {
        let env = Environment::isolated()
            .with_property("a", "${b}")
            .with_property("b", "${a}");
        let err = env.resolve_placeholders("${a}").unwrap_err();
        assert!(err.to_string().contains("circular"));
    }

    #[test]
    fn default_may_contain_placeholder() {
        let env = Environment::isolated().with_property("fallback", "shared");
        assert_eq!(
            env.resolve_placeholders("conf/${profile:${fallback}}.xml").unwrap(),
            "conf/shared.xml"
        );
        assert_eq!(
            env.resolve_placeholders("${a:${b:${c:deep}}}").unwrap(),
            "deep"
        );

        let explicit = env.clone().with_property("profile", "prod");
        assert_eq!(
            explicit
                .resolve_placeholders("conf/${profile:${fallback}}.xml")
                .unwrap(),
            "conf/prod.xml"
        );
    }

    #[test]
    fn unresolved_placeholder_in_default_is_error() {
        let env = Environment::isolated();
        let err = env.resolve_placeholders("${a:${b}}").unwrap_err();
        assert!(matches!(
            err,
            CtxError::UnresolvedPlaceholder { ref placeholder, .. } if placeholder == "b"
        ));
    }

    #[test]
    fn unclosed_placeholder_is_left_as_is() {
        let env = Environment::isolated();
        assert_eq!(env.resolve_placeholders("a-${b").unwrap(), "a-${b");
        assert_eq!(env.resolve_placeholders("a-${}").unwrap(), "a-${}");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        let env = Environment::isolated();
        assert_eq!(
            env.resolve_placeholders("file:/tmp/b.xml").unwrap(),
            "file:/tmp/b.xml"
        );
    }

    #[test]
    #[serial]
    fn falls_back_to_process_env() {
        std::env::set_var("CTXLOAD_TEST_PROFILE", "staging");
        let env = Environment::new();
        assert_eq!(
            env.resolve_placeholders("${CTXLOAD_TEST_PROFILE}.xml").unwrap(),
            "staging.xml"
        );

        let explicit = Environment::new().with_property("CTXLOAD_TEST_PROFILE", "local");
        assert_eq!(
            explicit
                .resolve_placeholders("${CTXLOAD_TEST_PROFILE}.xml")
                .unwrap(),
            "local.xml"
        );
        std::env::remove_var("CTXLOAD_TEST_PROFILE");
    }
}
