//! リーダー種別 → 実装の対応表

use super::{DefinitionReader, PropertiesDefinitionReader, XmlDefinitionReader};
use crate::declaration::ReaderKind;
use crate::environment::Environment;
use crate::error::{CtxError, Result};
use crate::resource::{Resource, ResourceLoader};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// リーダー生成時に渡す共有コンテキスト
#[derive(Clone)]
pub struct ReaderContext {
    pub loader: Arc<dyn ResourceLoader>,
    pub environment: Arc<Environment>,
    /// 1 回の処理で読み込んだリソース（プロセッサとリーダーで共有）
    pub imports: ImportTracker,
}

impl ReaderContext {
    pub fn new(loader: Arc<dyn ResourceLoader>, environment: Arc<Environment>) -> Self {
        Self {
            loader,
            environment,
            imports: ImportTracker::new(),
        }
    }

    /// 記録を空にしたコピー
    pub fn with_fresh_imports(&self) -> Self {
        Self {
            loader: self.loader.clone(),
            environment: self.environment.clone(),
            imports: ImportTracker::new(),
        }
    }
}

/// 読み込み済みリソースの記録
///
/// 同じリソースは 1 回だけ読み込む。2 回目以降は読み飛ばしとして記録する。
#[derive(Debug, Clone, Default)]
pub struct ImportTracker {
    state: Arc<Mutex<TrackerState>>,
}

#[derive(Debug, Default)]
struct TrackerState {
    imported: HashSet<String>,
    skipped: Vec<String>,
}

impl ImportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初回なら記録して true。読み込み済みなら読み飛ばしを記録して false
    pub fn try_import(&self, resource: &Resource) -> bool {
        let mut state = self.lock();
        if state.imported.insert(resource.identity()) {
            return true;
        }
        debug!(
            resource = resource.description(),
            "resource already imported, skipping"
        );
        state.skipped.push(resource.description().to_string());
        false
    }

    /// 前回の呼び出し以降に読み飛ばしたリソースの説明
    pub fn take_skipped(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().skipped)
    }

    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type ReaderCtor = Box<dyn Fn(&ReaderContext) -> Box<dyn DefinitionReader>>;

/// リーダーファクトリ
///
/// 識別子からリーダーを生成する。未登録の識別子は構成エラー。
pub struct ReaderFactory {
    ctors: HashMap<ReaderKind, ReaderCtor>,
}

impl Default for ReaderFactory {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ReaderFactory {
    /// 何も登録されていないファクトリ
    pub fn empty() -> Self {
        Self {
            ctors: HashMap::new(),
        }
    }

    /// XML・properties リーダーを登録済みのファクトリ
    pub fn with_defaults() -> Self {
        let mut factory = Self::empty();
        factory.register(ReaderKind::XML, |ctx| {
            Box::new(XmlDefinitionReader::new(ctx.clone()))
        });
        factory.register(ReaderKind::PROPERTIES, |_| {
            Box::new(PropertiesDefinitionReader::new())
        });
        factory
    }

    /// リーダーを登録（既存の種別は置き換え）
    pub fn register<F>(&mut self, kind: ReaderKind, ctor: F)
    where
        F: Fn(&ReaderContext) -> Box<dyn DefinitionReader> + 'static,
    {
        self.ctors.insert(kind, Box::new(ctor));
    }

    pub fn contains(&self, kind: &ReaderKind) -> bool {
        self.ctors.contains_key(kind)
    }

    /// 登録済みの種別（昇順）
    pub fn kinds(&self) -> Vec<ReaderKind> {
        let mut kinds: Vec<ReaderKind> = self.ctors.keys().cloned().collect();
        kinds.sort();
        kinds
    }

    /// 種別に対応するリーダーを生成
    pub fn create(
        &self,
        kind: &ReaderKind,
        context: &ReaderContext,
    ) -> Result<Box<dyn DefinitionReader>> {
        let ctor = self
            .ctors
            .get(kind)
            .ok_or_else(|| CtxError::UnknownReader(kind.to_string()))?;
        Ok(ctor(context))
    }
}
