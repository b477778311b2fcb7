//! 定義リーダー
//!
//! リソースの内容を解釈して Bean 定義をレジストリへ登録する。
//! 種別ごとの実装は [`ReaderFactory`] から識別子で取得する。

mod factory;
mod properties;
mod xml;

pub use factory::{ImportTracker, ReaderContext, ReaderFactory};
pub use properties::PropertiesDefinitionReader;
pub use xml::XmlDefinitionReader;

use crate::definition::BeanDefinition;
use crate::error::Result;
use crate::registry::DefinitionRegistry;
use crate::resource::Resource;

/// 定義リーダーの能力
pub trait DefinitionReader {
    /// リソースから定義を読み込んでレジストリに登録
    ///
    /// 戻り値はこの呼び出しで登録した定義数。内容が形式に合わない場合は
    /// `CtxError::ResourceParse`。
    fn load_definitions(
        &mut self,
        resource: &Resource,
        registry: &mut dyn DefinitionRegistry,
    ) -> Result<usize>;
}

/// 名前のない定義に `<class>#<n>` 形式の名前を付ける
///
/// クラスがなければ `<parent>$child#<n>`。どちらもなければ None。
pub(crate) fn generate_bean_name(
    definition: &BeanDefinition,
    registry: &dyn DefinitionRegistry,
) -> Option<String> {
    let prefix = match (&definition.class_name, &definition.parent) {
        (Some(class), _) => class.clone(),
        (None, Some(parent)) => format!("{}$child", parent),
        (None, None) => return None,
    };

    (0..)
        .map(|n| format!("{}#{}", prefix, n))
        .find(|candidate| {
            !registry.contains_definition(candidate)
                && registry.canonical_name(candidate) == *candidate
        })
}

/// `a, b;c d` 形式の名前リストを分割
pub(crate) fn split_names(raw: &str) -> Vec<String> {
    raw.split([',', ';', ' ', '\t', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod properties_test;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SimpleRegistry;

    #[test]
    fn generate_name_uses_first_free_counter() {
        let mut registry = SimpleRegistry::new();
        let def = BeanDefinition::new().with_class("com.example.Service");

        assert_eq!(
            generate_bean_name(&def, &registry).as_deref(),
            Some("com.example.Service#0")
        );

        registry
            .register_definition("com.example.Service#0", def.clone())
            .unwrap();
        assert_eq!(
            generate_bean_name(&def, &registry).as_deref(),
            Some("com.example.Service#1")
        );
    }

    #[test]
    fn generate_name_for_child_definition() {
        let registry = SimpleRegistry::new();
        let def = BeanDefinition::new().with_parent("base");
        assert_eq!(
            generate_bean_name(&def, &registry).as_deref(),
            Some("base$child#0")
        );
        assert_eq!(generate_bean_name(&BeanDefinition::new(), &registry), None);
    }

    #[test]
    fn split_names_accepts_mixed_separators() {
        assert_eq!(split_names("a, b;c  d"), vec!["a", "b", "c", "d"]);
        assert!(split_names(" , ").is_empty());
    }
}
