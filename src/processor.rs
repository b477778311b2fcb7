//! 構成ユニットの処理
//!
//! 登録されたユニットのインポート宣言を順に読み、ロケーションを解決して
//! 指定リーダーでレジストリへ定義を読み込む。
//!
//! 処理順: ユニット登録順 → 宣言順 → ロケーション順。最初のエラーで中断する。

use crate::config::LoaderConfig;
use crate::declaration::{ImportDeclaration, ReaderKind};
use crate::definition::BeanDefinition;
use crate::environment::Environment;
use crate::error::{CtxError, Result};
use crate::fs::{FileSystem, RealFs};
use crate::reader::{DefinitionReader, ReaderContext, ReaderFactory};
use crate::registry::{DefinitionRegistry, SimpleRegistry};
use crate::resource::{DefaultResourceLoader, ResourceLoader};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// インポート宣言を持つ構成ユニット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationUnit {
    name: String,
    imports: Vec<ImportDeclaration>,
}

impl ConfigurationUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            imports: Vec::new(),
        }
    }

    /// インポート宣言を追加
    pub fn import_resource(mut self, declaration: ImportDeclaration) -> Self {
        self.imports.push(declaration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn imports(&self) -> &[ImportDeclaration] {
        &self.imports
    }
}

/// 読み込んだリソース
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedResource {
    pub unit: String,
    pub reader: ReaderKind,
    pub resource: String,
    /// このリソース（とそのインポート）で登録された定義数
    pub definitions: usize,
}

/// 重複のため読み飛ばしたリソース
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedResource {
    pub unit: String,
    pub resource: String,
}

/// 処理結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub loaded: Vec<LoadedResource>,
    pub skipped: Vec<SkippedResource>,
}

impl BootstrapReport {
    /// 登録された定義の合計
    pub fn total_definitions(&self) -> usize {
        self.loaded.iter().map(|r| r.definitions).sum()
    }

    pub fn resource_count(&self) -> usize {
        self.loaded.len()
    }

    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }
}

/// 処理済みのレジストリと結果
#[derive(Debug, Clone)]
pub struct ApplicationContext {
    registry: SimpleRegistry,
    report: BootstrapReport,
}

impl ApplicationContext {
    pub fn registry(&self) -> &SimpleRegistry {
        &self.registry
    }

    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }

    /// エイリアスを解決して定義を取得
    pub fn definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.registry.resolve(name)
    }

    pub fn definition_names(&self) -> Vec<String> {
        self.registry.definition_names()
    }

    pub fn into_parts(self) -> (SimpleRegistry, BootstrapReport) {
        (self.registry, self.report)
    }
}

/// 構成ユニットのプロセッサ
pub struct ConfigurationProcessor {
    factory: ReaderFactory,
    context: ReaderContext,
    allow_overriding: bool,
    units: Vec<ConfigurationUnit>,
}

impl ConfigurationProcessor {
    /// 実ファイルシステムを使うプロセッサを作成
    pub fn new(config: &LoaderConfig, environment: Environment) -> Self {
        Self::with_fs(Arc::new(RealFs), config, environment)
    }

    /// ファイルシステムを指定してプロセッサを作成
    pub fn with_fs(
        fs: Arc<dyn FileSystem>,
        config: &LoaderConfig,
        environment: Environment,
    ) -> Self {
        let loader = DefaultResourceLoader::new(fs, config);
        Self::with_loader(Arc::new(loader), environment, config.allow_overriding)
    }

    /// ローダーを指定してプロセッサを作成
    pub fn with_loader(
        loader: Arc<dyn ResourceLoader>,
        environment: Environment,
        allow_overriding: bool,
    ) -> Self {
        Self {
            factory: ReaderFactory::with_defaults(),
            context: ReaderContext::new(loader, Arc::new(environment)),
            allow_overriding,
            units: Vec::new(),
        }
    }

    /// リーダーファクトリを差し替え
    pub fn with_factory(mut self, factory: ReaderFactory) -> Self {
        self.factory = factory;
        self
    }

    /// カスタムリーダーの登録用
    pub fn factory_mut(&mut self) -> &mut ReaderFactory {
        &mut self.factory
    }

    pub fn loader(&self) -> &dyn ResourceLoader {
        self.context.loader.as_ref()
    }

    pub fn environment(&self) -> &Environment {
        &self.context.environment
    }

    /// ユニットを登録（処理は登録順）
    pub fn register_unit(&mut self, unit: ConfigurationUnit) {
        self.units.push(unit);
    }

    pub fn units(&self) -> &[ConfigurationUnit] {
        &self.units
    }

    /// 新しいレジストリに全ユニットを読み込む
    ///
    /// 失敗時はコンテキストを返さない。
    pub fn bootstrap(&self) -> Result<ApplicationContext> {
        let mut registry = SimpleRegistry::with_overriding(self.allow_overriding);
        let report = self.process_into(&mut registry)?;
        info!(
            definitions = registry.definition_count(),
            resources = report.resource_count(),
            skipped = report.skip_count(),
            "bootstrap complete"
        );
        Ok(ApplicationContext { registry, report })
    }

    /// 既存のレジストリに全ユニットを読み込む
    ///
    /// 最初のエラーで中断する。それまでに登録された定義はレジストリに残る。
    pub fn process_into(&self, registry: &mut dyn DefinitionRegistry) -> Result<BootstrapReport> {
        let mut run = Run {
            factory: &self.factory,
            context: self.context.with_fresh_imports(),
            readers: HashMap::new(),
            report: BootstrapReport::default(),
        };

        for unit in &self.units {
            debug!(unit = unit.name(), imports = unit.imports().len(), "processing unit");
            for declaration in unit.imports() {
                run.process_declaration(unit.name(), declaration, registry)?;
            }
        }

        Ok(run.report)
    }
}

/// 1 回の処理の状態
struct Run<'a> {
    factory: &'a ReaderFactory,
    /// この処理専用の読み込み記録を持つコンテキスト
    context: ReaderContext,
    /// 種別ごとに 1 つのリーダーを使い回す
    readers: HashMap<ReaderKind, Box<dyn DefinitionReader>>,
    report: BootstrapReport,
}

impl Run<'_> {
    fn process_declaration(
        &mut self,
        unit: &str,
        declaration: &ImportDeclaration,
        registry: &mut dyn DefinitionRegistry,
    ) -> Result<()> {
        if declaration.locators().is_empty() {
            return Err(CtxError::EmptyLocators {
                unit: unit.to_string(),
            });
        }

        let kind = declaration.reader();

        for raw in declaration.locators() {
            let location = self.context.environment.resolve_placeholders(raw)?;
            if !self.readers.contains_key(kind) {
                let reader = self.factory.create(kind, &self.context)?;
                self.readers.insert(kind.clone(), reader);
            }
            let resources = self.context.loader.resolve(&location)?;
            if resources.is_empty() {
                debug!(unit, location = %location, "pattern matched no resources");
            }

            for resource in resources {
                if !self.context.imports.try_import(&resource) {
                    self.record_skipped(unit);
                    continue;
                }

                let reader = self
                    .readers
                    .get_mut(kind)
                    .ok_or_else(|| CtxError::UnknownReader(kind.to_string()))?;
                let count = reader.load_definitions(&resource, registry)?;
                // リーダーがインポート中に読み飛ばした分
                self.record_skipped(unit);
                debug!(
                    unit,
                    reader = %kind,
                    resource = resource.description(),
                    count,
                    "loaded resource"
                );
                self.report.loaded.push(LoadedResource {
                    unit: unit.to_string(),
                    reader: kind.clone(),
                    resource: resource.description().to_string(),
                    definitions: count,
                });
            }
        }

        Ok(())
    }

    fn record_skipped(&mut self, unit: &str) {
        for resource in self.context.imports.take_skipped() {
            self.report.skipped.push(SkippedResource {
                unit: unit.to_string(),
                resource,
            });
        }
    }
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod tests;
