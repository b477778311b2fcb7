//! Bean 定義モデル
//!
//! リーダーが生成しレジストリに格納される値。インスタンス化や
//! 参照の解決は行わない。

use serde::Serialize;
use std::fmt;

/// Bean のスコープ
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum Scope {
    #[default]
    Singleton,
    Prototype,
    Custom(String),
}

impl Scope {
    pub fn parse(value: &str) -> Self {
        match value {
            "" | "singleton" => Scope::Singleton,
            "prototype" => Scope::Prototype,
            other => Scope::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Scope::Singleton => "singleton",
            Scope::Prototype => "prototype",
            Scope::Custom(name) => name,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Scope> for String {
    fn from(scope: Scope) -> Self {
        scope.as_str().to_string()
    }
}

/// プロパティ・コンストラクタ引数の値
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// 文字列リテラル
    Value(String),
    /// 他の Bean 名への参照（未解決のまま保持）
    Ref(String),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Value(v) => write!(f, "{:?}", v),
            PropertyValue::Ref(name) => write!(f, "ref:{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstructorArg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub value: PropertyValue,
}

/// Bean 定義
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BeanDefinition {
    pub class_name: Option<String>,
    pub parent: Option<String>,
    pub scope: Scope,
    pub lazy_init: bool,
    #[serde(rename = "abstract")]
    pub abstract_definition: bool,
    pub primary: bool,
    pub depends_on: Vec<String>,
    pub init_method: Option<String>,
    pub destroy_method: Option<String>,
    pub description: Option<String>,
    pub constructor_args: Vec<ConstructorArg>,
    /// 宣言順のプロパティ
    pub properties: Vec<(String, PropertyValue)>,
    /// 定義元リソースの説明
    pub source: Option<String>,
}

impl BeanDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 同名のプロパティは後勝ちで置き換える
    pub fn set_property(&mut self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        match self.properties.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.properties.push((name, value)),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn add_constructor_arg(&mut self, index: Option<usize>, value: PropertyValue) {
        self.constructor_args.push(ConstructorArg { index, value });
    }

    /// クラスも親も持たない定義は実体化できない
    pub fn is_complete(&self) -> bool {
        self.class_name.is_some() || self.parent.is_some()
    }
}

#[cfg(test)]
#[path = "definition_test.rs"]
mod tests;
