//! リソースロケーションの解析

use crate::error::{CtxError, Result};
use serde::{Deserialize, Serialize};

const CLASSPATH_PREFIX: &str = "classpath:";
const FILE_PREFIX: &str = "file:";

/// ロケーションのスキーム
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Classpath,
    File,
    /// プレフィックスなし（ローダーのデフォルトで解決）
    Unspecified,
}

/// プレフィックスなしのロケーションに適用するスキーム
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DefaultScheme {
    #[default]
    Classpath,
    File,
}

/// 解析済みロケーション
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub scheme: Scheme,
    pub path: String,
}

impl Locator {
    /// ロケーション文字列を解析
    ///
    /// - 前後の空白は無視
    /// - `classpath:` の先頭 `/` は無視
    /// - `file://` 形式は `file:` と同じ
    /// - 2 文字以上の未知のスキームは Err（`C:\` のようなドライブ名は除く）
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();

        let (scheme, path) = if let Some(rest) = trimmed.strip_prefix(CLASSPATH_PREFIX) {
            (Scheme::Classpath, rest.trim_start_matches('/'))
        } else if let Some(rest) = trimmed.strip_prefix(FILE_PREFIX) {
            let rest = match rest.strip_prefix("//") {
                Some(after_authority) => after_authority,
                None => rest,
            };
            (Scheme::File, rest)
        } else {
            if let Some(scheme) = foreign_scheme(trimmed) {
                return Err(CtxError::UnsupportedScheme {
                    scheme: scheme.to_string(),
                    locator: raw.to_string(),
                });
            }
            (Scheme::Unspecified, trimmed)
        };

        if path.is_empty() {
            return Err(CtxError::UnresolvableLocator {
                locator: raw.to_string(),
                reason: "location has an empty path".to_string(),
            });
        }

        Ok(Self {
            scheme,
            path: path.to_string(),
        })
    }
}

/// `http:` や `jar:` のようなスキームを検出
fn foreign_scheme(location: &str) -> Option<&str> {
    let (candidate, _) = location.split_once(':')?;
    let mut chars = candidate.chars();
    let first = chars.next()?;
    let valid = candidate.len() >= 2
        && first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(candidate)
}
