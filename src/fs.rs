//! ファイルシステム抽象化
//!
//! リソースローダーが使用するファイルシステム操作の抽象化レイヤー。
//! テスト時に MockFs を注入してファイル操作をモック化できる。

use crate::error::{CtxError, Result};
use std::path::{Component, Path, PathBuf};

/// ファイルシステム操作を抽象化するトレイト
///
/// テスト時に MockFs を注入してファイル操作をモック化できる。
/// 本番コードでは RealFs を使用する。
pub trait FileSystem: Send + Sync {
    /// パスが存在するか（シンボリックリンク追従）
    fn exists(&self, path: &Path) -> bool;

    /// 通常ファイルかどうか（シンボリックリンク追従）
    fn is_file(&self, path: &Path) -> bool;

    /// ファイル内容をバイト列で読み込み
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// glob パターンに一致するファイルを列挙
    ///
    /// - ディレクトリは含まない
    /// - パス昇順
    /// - 一致なしは空の Vec
    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// 本番用ファイルシステム実装
pub struct RealFs;

impl FileSystem for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(std::fs::read(path)?)
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let entries = glob::glob(pattern).map_err(|e| {
            CtxError::Configuration(format!("invalid pattern '{}': {}", pattern, e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| CtxError::Io(e.into_error()))?;
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

/// `.` と `..` を字句的に取り除く
///
/// シンボリックリンクは解決しない。ルートより上の `..` は捨てる。
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    normalized.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    normalized.pop();
                } else if !normalized.has_root() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// パスに glob のメタ文字が含まれるか
pub fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

#[cfg(test)]
pub mod mock;

#[cfg(test)]
#[path = "fs_test.rs"]
mod tests;
