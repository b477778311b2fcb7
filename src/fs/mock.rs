//! テスト用モックファイルシステム

use super::*;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// テスト用モックファイルシステム
///
/// 登録したファイルのみ存在する。ディレクトリは暗黙的に扱う。
pub struct MockFs {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MockFs {
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
        }
    }

    /// ファイルを追加
    pub fn add_file(&self, path: &str, content: &str) {
        self.add_file_bytes(path, content.as_bytes());
    }

    /// バイナリファイルを追加
    pub fn add_file_bytes(&self, path: &str, content: &[u8]) {
        self.files
            .write()
            .unwrap()
            .insert(path.to_string(), content.to_vec());
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }
}

impl Default for MockFs {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFs {
    fn exists(&self, path: &Path) -> bool {
        let key = Self::key(path);
        let prefix = format!("{}/", key.trim_end_matches('/'));
        let files = self.files.read().unwrap();
        files.contains_key(&key) || files.keys().any(|k| k.starts_with(&prefix))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(&Self::key(path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .read()
            .unwrap()
            .get(&Self::key(path))
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "not found").into())
    }

    fn glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let compiled = glob::Pattern::new(pattern).map_err(|e| {
            CtxError::Configuration(format!("invalid pattern '{}': {}", pattern, e))
        })?;
        let options = glob::MatchOptions {
            require_literal_separator: true,
            ..Default::default()
        };

        // BTreeMap のキー順 = パス昇順
        Ok(self
            .files
            .read()
            .unwrap()
            .keys()
            .filter(|k| compiled.matches_with(k, options))
            .map(PathBuf::from)
            .collect())
    }
}
