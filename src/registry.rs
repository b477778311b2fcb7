//! 定義レジストリ
//!
//! リーダーが読み込んだ Bean 定義とエイリアスを保持する。
//! 登録順を保持し、上書きの可否は `allow_overriding` で制御する。

use crate::definition::BeanDefinition;
use crate::error::{CtxError, Result};
use std::collections::HashMap;
use tracing::{debug, info};

/// 登録操作の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterResult {
    Registered,
    Overridden,
}

/// Bean 定義の格納先
///
/// リーダーはこのトレイト越しに定義を登録する。
pub trait DefinitionRegistry {
    /// 定義を登録
    ///
    /// - 空の名前は Err
    /// - 既存名は上書き許可時のみ置換（登録位置は維持）
    fn register_definition(
        &mut self,
        name: &str,
        definition: BeanDefinition,
    ) -> Result<RegisterResult>;

    /// 定義を削除（関連エイリアスも削除）
    fn remove_definition(&mut self, name: &str) -> Result<BeanDefinition>;

    /// 名前で定義を取得（エイリアスは解決しない）
    fn definition(&self, name: &str) -> Option<&BeanDefinition>;

    fn contains_definition(&self, name: &str) -> bool {
        self.definition(name).is_some()
    }

    /// 登録順の定義名一覧
    fn definition_names(&self) -> Vec<String>;

    fn definition_count(&self) -> usize {
        self.definition_names().len()
    }

    /// エイリアスを登録
    fn register_alias(&mut self, name: &str, alias: &str) -> Result<()>;

    /// `name` を指すエイリアス一覧（登録順）
    fn aliases(&self, name: &str) -> Vec<String>;

    /// エイリアスを辿った正規名
    fn canonical_name(&self, name: &str) -> String;

    /// エイリアスを解決して定義を取得
    fn resolve(&self, name: &str) -> Option<&BeanDefinition> {
        let canonical = self.canonical_name(name);
        self.definition(&canonical)
    }
}

/// インメモリのレジストリ実装
#[derive(Debug, Clone)]
pub struct SimpleRegistry {
    names: Vec<String>,
    definitions: HashMap<String, BeanDefinition>,
    /// alias → target（登録順を保つため Vec で保持）
    aliases: Vec<(String, String)>,
    allow_overriding: bool,
}

impl Default for SimpleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleRegistry {
    /// 上書きを許可するレジストリを作成
    pub fn new() -> Self {
        Self::with_overriding(true)
    }

    pub fn with_overriding(allow_overriding: bool) -> Self {
        Self {
            names: Vec::new(),
            definitions: HashMap::new(),
            aliases: Vec::new(),
            allow_overriding,
        }
    }

    pub fn allows_overriding(&self) -> bool {
        self.allow_overriding
    }

    fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(a, _)| a == alias)
            .map(|(_, t)| t.as_str())
    }

    fn remove_alias(&mut self, alias: &str) {
        self.aliases.retain(|(a, _)| a != alias);
    }

    /// `name` からエイリアスを辿って `target` に到達するか
    fn resolves_to(&self, name: &str, target: &str) -> bool {
        let mut current = name;
        // 循環は登録時に拒否しているため有限回で終わる
        for _ in 0..=self.aliases.len() {
            if current == target {
                return true;
            }
            match self.alias_target(current) {
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }

    fn conflict(name: &str, reason: impl Into<String>) -> CtxError {
        CtxError::DefinitionConflict {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl DefinitionRegistry for SimpleRegistry {
    fn register_definition(
        &mut self,
        name: &str,
        definition: BeanDefinition,
    ) -> Result<RegisterResult> {
        if name.trim().is_empty() {
            return Err(CtxError::InvalidDefinition {
                name: name.to_string(),
                reason: "definition name must not be empty".to_string(),
            });
        }

        if self.alias_target(name).is_some() {
            if !self.allow_overriding {
                return Err(Self::conflict(name, "name is already used as an alias"));
            }
            debug!(name, "replacing alias with definition of the same name");
            self.remove_alias(name);
        }

        if let Some(existing) = self.definitions.get_mut(name) {
            if !self.allow_overriding {
                return Err(Self::conflict(
                    name,
                    format!(
                        "already defined in {}",
                        existing.source.as_deref().unwrap_or("an unknown resource")
                    ),
                ));
            }
            info!(
                name,
                previous = existing.source.as_deref().unwrap_or("-"),
                replacement = definition.source.as_deref().unwrap_or("-"),
                "overriding definition"
            );
            *existing = definition;
            return Ok(RegisterResult::Overridden);
        }

        self.names.push(name.to_string());
        self.definitions.insert(name.to_string(), definition);
        Ok(RegisterResult::Registered)
    }

    fn remove_definition(&mut self, name: &str) -> Result<BeanDefinition> {
        let definition = self
            .definitions
            .remove(name)
            .ok_or_else(|| CtxError::NoSuchDefinition(name.to_string()))?;
        self.names.retain(|n| n != name);
        self.aliases.retain(|(_, target)| target != name);
        Ok(definition)
    }

    fn definition(&self, name: &str) -> Option<&BeanDefinition> {
        self.definitions.get(name)
    }

    fn definition_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn definition_count(&self) -> usize {
        self.names.len()
    }

    fn register_alias(&mut self, name: &str, alias: &str) -> Result<()> {
        if name.trim().is_empty() || alias.trim().is_empty() {
            return Err(CtxError::InvalidDefinition {
                name: name.to_string(),
                reason: "alias and target must not be empty".to_string(),
            });
        }

        if alias == name {
            self.remove_alias(alias);
            return Ok(());
        }

        if self.definitions.contains_key(alias) {
            return Err(Self::conflict(alias, "alias collides with a definition name"));
        }

        if let Some(current) = self.alias_target(alias) {
            if current == name {
                return Ok(());
            }
            if !self.allow_overriding {
                return Err(Self::conflict(
                    alias,
                    format!("alias already points to '{}'", current),
                ));
            }
            debug!(alias, from = current, to = name, "re-pointing alias");
            self.remove_alias(alias);
        }

        if self.resolves_to(name, alias) {
            return Err(Self::conflict(
                alias,
                format!("alias would create a cycle through '{}'", name),
            ));
        }

        self.aliases.push((alias.to_string(), name.to_string()));
        Ok(())
    }

    fn aliases(&self, name: &str) -> Vec<String> {
        self.aliases
            .iter()
            .filter(|(_, target)| target == name)
            .map(|(alias, _)| alias.clone())
            .collect()
    }

    fn canonical_name(&self, name: &str) -> String {
        let mut current = name;
        for _ in 0..=self.aliases.len() {
            match self.alias_target(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        current.to_string()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
