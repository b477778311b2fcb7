//! リソースとリソースローダー
//!
//! ロケーション文字列（`classpath:` / `file:` / プレフィックスなし）を
//! 読み込み可能なリソースへ解決する。

mod loader;
mod locator;

pub use loader::{DefaultResourceLoader, ResourceLoader};
pub use locator::{DefaultScheme, Locator, Scheme};

use crate::error::{CtxError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// リソースの出自
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// クラスパスルートからの相対パス
    Classpath(String),
    /// ファイルシステム上のパス
    File,
    /// メモリ上の内容（テスト・埋め込み用）
    Memory,
}

/// 読み込み済みリソース
#[derive(Debug, Clone)]
pub struct Resource {
    description: String,
    origin: Origin,
    path: Option<PathBuf>,
    content: Vec<u8>,
}

impl Resource {
    /// クラスパス上で見つかったリソース
    pub fn classpath(relative: &str, path: PathBuf, content: Vec<u8>) -> Self {
        Self {
            description: format!("class path resource [{}]", relative),
            origin: Origin::Classpath(relative.to_string()),
            path: Some(path),
            content,
        }
    }

    /// ファイルシステム上のリソース
    pub fn file(path: PathBuf, content: Vec<u8>) -> Self {
        Self {
            description: format!("file [{}]", path.display()),
            origin: Origin::File,
            path: Some(path),
            content,
        }
    }

    /// メモリ上のリソース
    pub fn from_bytes(description: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            description: description.into(),
            origin: Origin::Memory,
            path: None,
            content: content.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// 同一リソース判定用のキー（ファイルならパス、それ以外は説明）
    pub fn identity(&self) -> String {
        match &self.path {
            Some(path) => path.to_string_lossy().to_string(),
            None => self.description.clone(),
        }
    }

    /// UTF-8 として内容を取得（BOM は除去）
    pub fn contents_utf8(&self) -> Result<&str> {
        let text = std::str::from_utf8(&self.content).map_err(|e| {
            CtxError::parse(&self.description, format!("content is not valid UTF-8: {}", e))
        })?;
        Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

#[cfg(test)]
mod loader_test;
