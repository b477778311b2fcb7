//! マニフェスト（構成ユニットの一覧）
//!
//! 拡張子で形式を判定する: `.yaml` / `.yml` は YAML、`.json` は JSON、それ以外は TOML。

use crate::config::{ContextSection, LoaderConfig};
use crate::declaration::ImportDeclaration;
use crate::environment::Environment;
use crate::error::{CtxError, Result};
use crate::processor::{ConfigurationProcessor, ConfigurationUnit};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::debug;

/// マニフェストの形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Yaml,
    Json,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml" | "yml") => ManifestFormat::Yaml,
            Some("json") => ManifestFormat::Json,
            _ => ManifestFormat::Toml,
        }
    }
}

/// `[[units]]` の 1 要素
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitSpec {
    pub name: String,
    #[serde(default)]
    pub imports: Vec<ImportDeclaration>,
}

/// マニフェストのスキーマ
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub context: ContextSection,
    /// プレースホルダーの値
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
}

impl Manifest {
    /// 文字列からパース
    pub fn parse(content: &str, format: ManifestFormat) -> Result<Self> {
        let manifest: Self = match format {
            ManifestFormat::Toml => toml::from_str(content)?,
            ManifestFormat::Yaml => serde_yaml::from_str(content)?,
            ManifestFormat::Json => serde_json::from_str(content)?,
        };
        manifest.validate()?;
        Ok(manifest)
    }

    /// ファイルから読み込み
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let manifest = Self::parse(&content, ManifestFormat::from_path(path))?;
        debug!(path = %path.display(), units = manifest.units.len(), "loaded manifest");
        Ok(manifest)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for unit in &self.units {
            if unit.name.trim().is_empty() {
                return Err(CtxError::InvalidManifest(
                    "unit name must not be empty".to_string(),
                ));
            }
            if !seen.insert(unit.name.as_str()) {
                return Err(CtxError::InvalidManifest(format!(
                    "unit '{}' is declared more than once",
                    unit.name
                )));
            }
        }
        Ok(())
    }

    /// 宣言順の構成ユニット
    pub fn units(&self) -> Vec<ConfigurationUnit> {
        self.units
            .iter()
            .map(|spec| {
                spec.imports
                    .iter()
                    .cloned()
                    .fold(ConfigurationUnit::new(&spec.name), ConfigurationUnit::import_resource)
            })
            .collect()
    }
}

/// 読み込み済みのマニフェストとその置き場所
#[derive(Debug, Clone)]
pub struct ManifestFile {
    pub path: PathBuf,
    pub manifest: Manifest,
}

impl ManifestFile {
    /// 読み込み（パスは絶対パスにして保持）
    pub fn load(path: &Path) -> Result<Self> {
        let manifest = Manifest::load(path)?;
        Ok(Self {
            path: std::path::absolute(path)?,
            manifest,
        })
    }

    /// マニフェストのあるディレクトリ（相対パスの基準）
    pub fn dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// デフォルト < `[context]` < 環境変数 の順で設定を組み立てる
    pub fn loader_config(&self) -> Result<LoaderConfig> {
        LoaderConfig::default()
            .apply_manifest(&self.manifest.context, &self.dir())
            .apply_env()
    }

    /// `[properties]` を持つ環境
    pub fn environment(&self) -> Environment {
        let mut environment = Environment::new();
        environment.extend(self.manifest.properties.clone());
        environment
    }

    /// 全ユニットを登録したプロセッサ
    pub fn processor(&self, config: &LoaderConfig, environment: Environment) -> ConfigurationProcessor {
        let mut processor = ConfigurationProcessor::new(config, environment);
        for unit in self.manifest.units() {
            processor.register_unit(unit);
        }
        processor
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
