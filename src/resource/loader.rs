//! ロケーション → リソース解決

use super::locator::{DefaultScheme, Locator, Scheme};
use super::{Origin, Resource};
use crate::config::LoaderConfig;
use crate::error::{CtxError, Result};
use crate::fs::{is_pattern, normalize_path, FileSystem};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// ロケーション文字列をリソースへ解決するトレイト
pub trait ResourceLoader {
    /// ロケーションを解決
    ///
    /// - パターンでないロケーションは 1 件、見つからなければ Err
    /// - パターンは 0 件以上（パス昇順）
    fn resolve(&self, location: &str) -> Result<Vec<Resource>>;

    /// `base` からの相対ロケーションを解決
    ///
    /// スキーム付きのロケーションは `resolve` と同じ扱い。
    fn resolve_relative(&self, base: &Resource, location: &str) -> Result<Vec<Resource>>;
}

/// クラスパスルートとベースディレクトリを使う標準ローダー
pub struct DefaultResourceLoader {
    fs: Arc<dyn FileSystem>,
    classpath: Vec<PathBuf>,
    base_dir: PathBuf,
    default_scheme: DefaultScheme,
}

impl DefaultResourceLoader {
    pub fn new(fs: Arc<dyn FileSystem>, config: &LoaderConfig) -> Self {
        Self {
            fs,
            classpath: config.classpath.clone(),
            base_dir: config.base_dir.clone(),
            default_scheme: config.default_scheme,
        }
    }

    pub fn classpath(&self) -> &[PathBuf] {
        &self.classpath
    }

    fn resolve_classpath(&self, location: &str, path: &str) -> Result<Vec<Resource>> {
        let relative = normalize_path(Path::new(path));
        let relative_str = relative.to_string_lossy().to_string();

        if self.classpath.is_empty() {
            return Err(CtxError::UnresolvableLocator {
                locator: location.to_string(),
                reason: "no class path roots are configured".to_string(),
            });
        }

        // パターンは最初に一致したルートのみを対象にする
        if is_pattern(&relative_str) {
            for root in &self.classpath {
                let pattern = root.join(&relative);
                let found = self.fs.glob(&pattern.to_string_lossy())?;
                if found.is_empty() {
                    continue;
                }
                let mut resources = Vec::with_capacity(found.len());
                for path in found {
                    let rel = path
                        .strip_prefix(root)
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_else(|_| path.to_string_lossy().to_string());
                    let content = self.fs.read(&path)?;
                    resources.push(Resource::classpath(&rel, path, content));
                }
                debug!(location, root = %root.display(), matches = resources.len(), "resolved class path pattern");
                return Ok(resources);
            }
            debug!(location, "class path pattern matched nothing");
            return Ok(Vec::new());
        }

        for root in &self.classpath {
            let candidate = root.join(&relative);
            trace!(candidate = %candidate.display(), "probing class path root");
            if self.fs.is_file(&candidate) {
                let content = self.fs.read(&candidate)?;
                return Ok(vec![Resource::classpath(&relative_str, candidate, content)]);
            }
        }

        Err(CtxError::UnresolvableLocator {
            locator: location.to_string(),
            reason: format!(
                "class path resource [{}] not found in {}",
                relative_str,
                self.describe_classpath()
            ),
        })
    }

    fn resolve_file(&self, location: &str, path: &str) -> Result<Vec<Resource>> {
        let raw = Path::new(path);
        let absolute = if raw.is_absolute() {
            normalize_path(raw)
        } else {
            normalize_path(&self.base_dir.join(raw))
        };

        if is_pattern(path) {
            let mut resources = Vec::new();
            for found in self.fs.glob(&absolute.to_string_lossy())? {
                let content = self.fs.read(&found)?;
                resources.push(Resource::file(found, content));
            }
            debug!(location, matches = resources.len(), "resolved file pattern");
            return Ok(resources);
        }

        if !self.fs.is_file(&absolute) {
            let problem = if self.fs.exists(&absolute) {
                "is not a regular file"
            } else {
                "does not exist"
            };
            return Err(CtxError::UnresolvableLocator {
                locator: location.to_string(),
                reason: format!("file [{}] {}", absolute.display(), problem),
            });
        }

        let content = self.fs.read(&absolute)?;
        Ok(vec![Resource::file(absolute, content)])
    }

    /// 存在しないルートには `(missing)` を付ける
    fn describe_classpath(&self) -> String {
        let roots: Vec<String> = self
            .classpath
            .iter()
            .map(|p| {
                if self.fs.exists(p) {
                    p.display().to_string()
                } else {
                    format!("{} (missing)", p.display())
                }
            })
            .collect();
        format!("[{}]", roots.join(", "))
    }
}

impl ResourceLoader for DefaultResourceLoader {
    fn resolve(&self, location: &str) -> Result<Vec<Resource>> {
        let locator = Locator::parse(location)?;
        match (locator.scheme, self.default_scheme) {
            (Scheme::Classpath, _) | (Scheme::Unspecified, DefaultScheme::Classpath) => {
                self.resolve_classpath(location, &locator.path)
            }
            (Scheme::File, _) | (Scheme::Unspecified, DefaultScheme::File) => {
                self.resolve_file(location, &locator.path)
            }
        }
    }

    fn resolve_relative(&self, base: &Resource, location: &str) -> Result<Vec<Resource>> {
        let locator = Locator::parse(location)?;
        if locator.scheme != Scheme::Unspecified {
            return self.resolve(location);
        }

        // 先頭の `/` があっても基準リソースからの相対とみなす
        let relative = locator.path.trim_start_matches('/');

        match base.origin() {
            Origin::Classpath(base_rel) => {
                let parent = Path::new(base_rel).parent().unwrap_or(Path::new(""));
                let joined = parent.join(relative);
                self.resolve_classpath(location, &joined.to_string_lossy())
            }
            Origin::File => {
                let parent = base
                    .path()
                    .and_then(Path::parent)
                    .unwrap_or(self.base_dir.as_path());
                let joined = parent.join(relative);
                self.resolve_file(location, &joined.to_string_lossy())
            }
            Origin::Memory => Err(CtxError::UnresolvableLocator {
                locator: location.to_string(),
                reason: format!(
                    "cannot resolve a relative location against {}",
                    base.description()
                ),
            }),
        }
    }
}
