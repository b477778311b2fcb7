//! `<beans>` XML リーダー
//!
//! # 対応要素
//!
//! ```text
//! <beans default-lazy-init="false">
//!   <bean id="..." name="a,b" class="..." parent="..." scope="..."
//!         lazy-init="..." abstract="..." primary="..." depends-on="..."
//!         init-method="..." destroy-method="...">
//!     <property name="..." value="..."/>        | ref="..." | <value>..</value> | <ref bean=".."/>
//!     <constructor-arg index="0" value="..."/>  | 同上
//!   </bean>
//!   <alias name="..." alias="..."/>
//!   <import resource="..."/>
//! </beans>
//! ```
//!
//! プレフィックス付き要素（`context:component-scan` 等）は警告を出して無視する。

use super::factory::ReaderContext;
use super::{generate_bean_name, split_names, DefinitionReader};
use crate::definition::{BeanDefinition, PropertyValue, Scope};
use crate::error::{CtxError, Result};
use crate::registry::DefinitionRegistry;
use crate::resource::Resource;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashSet;
use tracing::{debug, warn};

/// 解析済みの XML 要素
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// 空文字列は未指定として扱う
    fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    fn is_namespaced(&self) -> bool {
        self.name.contains(':')
    }
}

/// XML 定義リーダー
pub struct XmlDefinitionReader {
    context: ReaderContext,
    /// 読み込み中のリソース（循環インポート検出用）
    loading: Vec<String>,
}

impl XmlDefinitionReader {
    pub fn new(context: ReaderContext) -> Self {
        Self {
            context,
            loading: Vec::new(),
        }
    }

    fn load_document(
        &mut self,
        resource: &Resource,
        registry: &mut dyn DefinitionRegistry,
    ) -> Result<usize> {
        let root = parse_document(resource)?;
        if root.name != "beans" {
            return Err(CtxError::parse(
                resource.description(),
                format!("root element must be <beans>, found <{}>", root.name),
            ));
        }

        let default_lazy = match root.non_empty_attr("default-lazy-init") {
            Some(raw) if raw != "default" => parse_bool(resource, "default-lazy-init", raw)?,
            _ => false,
        };

        let mut used_names = HashSet::new();
        let mut count = 0;

        for child in &root.children {
            match child.name.as_str() {
                "bean" => {
                    let (name, aliases) =
                        self.register_bean(child, resource, default_lazy, &mut used_names, registry)?;
                    debug!(name = %name, ?aliases, "registered XML definition");
                    count += 1;
                }
                "alias" => {
                    let name = required_attr(child, resource, "name")?;
                    let alias = required_attr(child, resource, "alias")?;
                    registry.register_alias(name, alias)?;
                }
                "import" => {
                    count += self.import(child, resource, registry)?;
                }
                "description" => {}
                _ if child.is_namespaced() => {
                    warn!(
                        element = %child.name,
                        resource = resource.description(),
                        "no handler for namespaced element, skipping"
                    );
                }
                other => {
                    return Err(CtxError::parse(
                        resource.description(),
                        format!("unexpected element <{}> in <beans>", other),
                    ))
                }
            }
        }

        Ok(count)
    }

    fn import(
        &mut self,
        element: &Element,
        resource: &Resource,
        registry: &mut dyn DefinitionRegistry,
    ) -> Result<usize> {
        let location = required_attr(element, resource, "resource")?;
        let location = self.context.environment.resolve_placeholders(location)?;
        let imported = self.context.loader.resolve_relative(resource, &location)?;

        let mut count = 0;
        for target in &imported {
            self.check_cycle(target)?;
            if !self.context.imports.try_import(target) {
                continue;
            }
            debug!(from = resource.description(), to = target.description(), "importing");
            count += self.load_definitions(target, registry)?;
        }
        Ok(count)
    }

    /// 読み込み中のリソースを再び読み込もうとしていれば Err
    fn check_cycle(&self, resource: &Resource) -> Result<()> {
        let identity = resource.identity();
        if !self.loading.contains(&identity) {
            return Ok(());
        }
        let mut chain = self.loading.clone();
        chain.push(identity);
        Err(CtxError::parse(
            resource.description(),
            format!("cyclic import detected: {}", chain.join(" -> ")),
        ))
    }

    fn register_bean(
        &self,
        element: &Element,
        resource: &Resource,
        default_lazy: bool,
        used_names: &mut HashSet<String>,
        registry: &mut dyn DefinitionRegistry,
    ) -> Result<(String, Vec<String>)> {
        let mut definition = parse_bean(element, resource, default_lazy)?;
        definition.source = Some(resource.description().to_string());

        let id = element.non_empty_attr("id").map(str::to_string);
        let mut aliases = element
            .non_empty_attr("name")
            .map(split_names)
            .unwrap_or_default();

        let name = match id {
            Some(id) => id,
            None if !aliases.is_empty() => aliases.remove(0),
            None => generate_bean_name(&definition, registry).ok_or_else(|| {
                CtxError::parse(
                    resource.description(),
                    "unnamed <bean> specifies neither 'class' nor 'parent'",
                )
            })?,
        };

        if !definition.is_complete() && !definition.abstract_definition {
            return Err(CtxError::parse(
                resource.description(),
                format!("bean '{}' specifies neither 'class' nor 'parent'", name),
            ));
        }

        for candidate in std::iter::once(&name).chain(aliases.iter()) {
            if !used_names.insert(candidate.clone()) {
                return Err(CtxError::parse(
                    resource.description(),
                    format!("bean name '{}' is already used in this <beans> element", candidate),
                ));
            }
        }

        registry.register_definition(&name, definition)?;
        for alias in &aliases {
            registry.register_alias(&name, alias)?;
        }
        Ok((name, aliases))
    }
}

impl DefinitionReader for XmlDefinitionReader {
    fn load_definitions(
        &mut self,
        resource: &Resource,
        registry: &mut dyn DefinitionRegistry,
    ) -> Result<usize> {
        self.check_cycle(resource)?;

        self.loading.push(resource.identity());
        let result = self.load_document(resource, registry);
        self.loading.pop();

        let count = result?;
        debug!(resource = resource.description(), count, "loaded XML definitions");
        Ok(count)
    }
}

fn parse_bean(element: &Element, resource: &Resource, default_lazy: bool) -> Result<BeanDefinition> {
    let mut definition = BeanDefinition::new();
    definition.class_name = element.non_empty_attr("class").map(str::to_string);
    definition.parent = element.non_empty_attr("parent").map(str::to_string);
    definition.scope = Scope::parse(element.non_empty_attr("scope").unwrap_or(""));
    definition.lazy_init = match element.non_empty_attr("lazy-init") {
        Some("default") | None => default_lazy,
        Some(raw) => parse_bool(resource, "lazy-init", raw)?,
    };
    if let Some(raw) = element.non_empty_attr("abstract") {
        definition.abstract_definition = parse_bool(resource, "abstract", raw)?;
    }
    if let Some(raw) = element.non_empty_attr("primary") {
        definition.primary = parse_bool(resource, "primary", raw)?;
    }
    definition.depends_on = element
        .non_empty_attr("depends-on")
        .map(split_names)
        .unwrap_or_default();
    definition.init_method = element.non_empty_attr("init-method").map(str::to_string);
    definition.destroy_method = element.non_empty_attr("destroy-method").map(str::to_string);

    for child in &element.children {
        match child.name.as_str() {
            "property" => {
                let name = required_attr(child, resource, "name")?;
                let value = parse_value(child, resource)?;
                definition.set_property(name, value);
            }
            "constructor-arg" => {
                let index = match child.non_empty_attr("index") {
                    Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                        CtxError::parse(
                            resource.description(),
                            format!("constructor-arg index '{}' is not a non-negative integer", raw),
                        )
                    })?),
                    None => None,
                };
                let value = parse_value(child, resource)?;
                definition.add_constructor_arg(index, value);
            }
            "description" => {
                definition.description = Some(child.text.trim().to_string());
            }
            "bean" => {
                return Err(CtxError::parse(
                    resource.description(),
                    "inner <bean> definitions are not supported",
                ))
            }
            _ if child.is_namespaced() => {
                warn!(
                    element = %child.name,
                    resource = resource.description(),
                    "no handler for namespaced element, skipping"
                );
            }
            other => {
                return Err(CtxError::parse(
                    resource.description(),
                    format!("unexpected element <{}> in <bean>", other),
                ))
            }
        }
    }

    Ok(definition)
}

/// `value`/`ref` 属性、または `<value>`/`<ref>` 子要素のいずれか 1 つから値を取得
fn parse_value(element: &Element, resource: &Resource) -> Result<PropertyValue> {
    let nested: Vec<&Element> = element
        .children
        .iter()
        .filter(|c| c.name != "description")
        .collect();

    let sources = usize::from(element.attr("value").is_some())
        + usize::from(element.attr("ref").is_some())
        + nested.len();
    if sources != 1 {
        return Err(CtxError::parse(
            resource.description(),
            format!(
                "<{}> must specify exactly one of 'value', 'ref' or a nested value element",
                element.name
            ),
        ));
    }

    if let Some(value) = element.attr("value") {
        return Ok(PropertyValue::Value(value.to_string()));
    }
    if let Some(name) = element.attr("ref") {
        return Ok(PropertyValue::Ref(name.trim().to_string()));
    }

    let inner = nested[0];
    match inner.name.as_str() {
        "value" => Ok(PropertyValue::Value(inner.text.clone())),
        "ref" => {
            let name = required_attr(inner, resource, "bean")?;
            Ok(PropertyValue::Ref(name.to_string()))
        }
        "bean" => Err(CtxError::parse(
            resource.description(),
            "inner <bean> definitions are not supported",
        )),
        other => Err(CtxError::parse(
            resource.description(),
            format!("unsupported value element <{}>", other),
        )),
    }
}

fn required_attr<'a>(element: &'a Element, resource: &Resource, name: &str) -> Result<&'a str> {
    element.non_empty_attr(name).ok_or_else(|| {
        CtxError::parse(
            resource.description(),
            format!("<{}> requires attribute '{}'", element.name, name),
        )
    })
}

fn parse_bool(resource: &Resource, attribute: &str, raw: &str) -> Result<bool> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(CtxError::parse(
            resource.description(),
            format!("attribute '{}' must be true or false, got '{}'", attribute, other),
        )),
    }
}

/// ドキュメントを要素ツリーに変換
fn parse_document(resource: &Resource) -> Result<Element> {
    let text = resource.contents_utf8()?;
    let mut reader = Reader::from_str(text);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(CtxError::parse(
                    resource.description(),
                    format!("malformed XML near byte {}: {}", reader.buffer_position(), e),
                ))
            }
        };

        match event {
            Event::Start(start) => stack.push(element_from(&start, resource)?),
            Event::Empty(start) => {
                let element = element_from(&start, resource)?;
                attach(element, &mut stack, &mut root, resource)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    CtxError::parse(resource.description(), "unexpected closing tag")
                })?;
                attach(element, &mut stack, &mut root, resource)?;
            }
            Event::Text(chunk) => {
                let unescaped = chunk.unescape().map_err(|e| {
                    CtxError::parse(resource.description(), format!("invalid text: {}", e))
                })?;
                // 要素間のインデントは捨てる。`<value>` の内容は書かれたまま保持する
                let in_value = stack.last().is_some_and(|e| e.name == "value");
                if !in_value && unescaped.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(current) => current.text.push_str(&unescaped),
                    None => {
                        return Err(CtxError::parse(
                            resource.description(),
                            "text outside of the root element",
                        ))
                    }
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            // 宣言・コメント・処理命令・DOCTYPE
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(CtxError::parse(
            resource.description(),
            format!("unexpected end of document, <{}> is not closed", open.name),
        ));
    }

    root.ok_or_else(|| CtxError::parse(resource.description(), "document has no root element"))
}

fn element_from(start: &BytesStart<'_>, resource: &Resource) -> Result<Element> {
    let invalid = |message: String| CtxError::parse(resource.description(), message);

    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| invalid(format!("invalid element name: {}", e)))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| invalid(format!("invalid attribute on <{}>: {}", name, e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| invalid(format!("invalid attribute name on <{}>: {}", name, e)))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| invalid(format!("invalid value for '{}' on <{}>: {}", key, name, e)))?
            .to_string();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
    resource: &Resource,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(CtxError::parse(
            resource.description(),
            "document has more than one root element",
        ));
    }
    *root = Some(element);
    Ok(())
}
