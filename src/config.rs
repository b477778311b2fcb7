//! ローダー設定
//!
//! 優先順位: デフォルト < マニフェストの `[context]` < 環境変数 < CLI 引数

use crate::env::EnvVar;
use crate::error::{CtxError, Result};
use crate::resource::DefaultScheme;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// クラスパスルート（OS のパス区切りで連結）
pub const ENV_CLASSPATH: &str = "CTXLOAD_CLASSPATH";
/// 定義の上書きを許可するか
pub const ENV_ALLOW_OVERRIDING: &str = "CTXLOAD_ALLOW_OVERRIDING";

/// リソース解決とレジストリの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// クラスパスルート（検索順）
    pub classpath: Vec<PathBuf>,
    /// 相対 `file:` ロケーションの基準ディレクトリ
    pub base_dir: PathBuf,
    /// プレフィックスなしロケーションのスキーム
    pub default_scheme: DefaultScheme,
    /// 同名定義の上書きを許可するか
    pub allow_overriding: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            classpath: Vec::new(),
            base_dir: PathBuf::from("."),
            default_scheme: DefaultScheme::Classpath,
            allow_overriding: true,
        }
    }
}

/// マニフェストの `[context]` テーブル
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContextSection {
    #[serde(default)]
    pub classpath: Vec<PathBuf>,
    pub default_scheme: Option<DefaultScheme>,
    pub allow_overriding: Option<bool>,
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// クラスパスルートを末尾に追加
    pub fn with_classpath_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.classpath.push(root.into());
        self
    }

    pub fn with_default_scheme(mut self, scheme: DefaultScheme) -> Self {
        self.default_scheme = scheme;
        self
    }

    pub fn with_overriding(mut self, allow: bool) -> Self {
        self.allow_overriding = allow;
        self
    }

    /// マニフェストの `[context]` を適用
    ///
    /// 相対クラスパスは `manifest_dir` 基準で解決し、`base_dir` も `manifest_dir` になる。
    pub fn apply_manifest(mut self, section: &ContextSection, manifest_dir: &Path) -> Self {
        self.base_dir = manifest_dir.to_path_buf();
        self.classpath.extend(
            section
                .classpath
                .iter()
                .map(|root| absolutize(root, manifest_dir)),
        );
        if let Some(scheme) = section.default_scheme {
            self.default_scheme = scheme;
        }
        if let Some(allow) = section.allow_overriding {
            self.allow_overriding = allow;
        }
        self
    }

    /// 環境変数を適用
    ///
    /// `CTXLOAD_CLASSPATH` のルートはマニフェストのルートより先に検索される。
    pub fn apply_env(mut self) -> Result<Self> {
        if let Some(raw) = EnvVar::get(ENV_CLASSPATH) {
            let mut roots: Vec<PathBuf> = std::env::split_paths(&raw)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| absolutize(&p, &self.base_dir))
                .collect();
            roots.append(&mut self.classpath);
            self.classpath = roots;
        }

        match EnvVar::get_bool(ENV_ALLOW_OVERRIDING) {
            Some(Ok(allow)) => self.allow_overriding = allow,
            Some(Err(raw)) => {
                return Err(CtxError::Configuration(format!(
                    "{} must be true or false, got '{}'",
                    ENV_ALLOW_OVERRIDING, raw
                )))
            }
            None => {}
        }

        Ok(self)
    }
}

fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
