//! `.properties` 形式のリーダー
//!
//! # キーの形式
//!
//! ```text
//! dataSource.(class)=com.example.DataSource
//! dataSource.(scope)=prototype
//! dataSource.url=jdbc:h2:mem:test
//! repo.(parent)=baseRepo
//! repo.dataSource(ref)=dataSource
//! repo.cache=*cacheManager
//! repo.$0=first constructor argument
//! ```
//!
//! `*` で始まる値は参照、`**` で始まる値はリテラルの `*` になる。
//! Bean 名は最後の `.` より前の部分。`.` を含まないキーは無視する。

use super::{split_names, DefinitionReader};
use crate::definition::{BeanDefinition, PropertyValue, Scope};
use crate::error::{CtxError, Result};
use crate::registry::DefinitionRegistry;
use crate::resource::Resource;
use std::collections::HashMap;
use tracing::debug;

const REF_SUFFIX: &str = "(ref)";
const REF_PREFIX: char = '*';
const CONSTRUCTOR_ARG_PREFIX: char = '$';

/// properties 定義リーダー
#[derive(Debug, Default)]
pub struct PropertiesDefinitionReader;

impl PropertiesDefinitionReader {
    pub fn new() -> Self {
        Self
    }
}

impl DefinitionReader for PropertiesDefinitionReader {
    fn load_definitions(
        &mut self,
        resource: &Resource,
        registry: &mut dyn DefinitionRegistry,
    ) -> Result<usize> {
        let text = resource.contents_utf8()?;
        let entries = parse_properties(text)
            .map_err(|msg| CtxError::parse(resource.description(), msg))?;

        let mut order: Vec<String> = Vec::new();
        let mut definitions: HashMap<String, BeanDefinition> = HashMap::new();

        for (key, value) in entries {
            let Some((bean, attribute)) = key.rsplit_once('.') else {
                debug!(key = %key, "ignoring key without bean name");
                continue;
            };
            if bean.is_empty() || attribute.is_empty() {
                debug!(key = %key, "ignoring key with empty bean or attribute name");
                continue;
            }

            let definition = definitions.entry(bean.to_string()).or_insert_with(|| {
                order.push(bean.to_string());
                BeanDefinition::new()
            });
            apply_entry(definition, bean, attribute, &value)
                .map_err(|msg| CtxError::parse(resource.description(), msg))?;
        }

        let mut count = 0;
        for name in order {
            let Some(mut definition) = definitions.remove(&name) else {
                continue;
            };
            if !definition.is_complete() && !definition.abstract_definition {
                return Err(CtxError::parse(
                    resource.description(),
                    format!("bean '{}' has neither (class) nor (parent)", name),
                ));
            }
            definition.constructor_args.sort_by_key(|arg| arg.index);
            definition.source = Some(resource.description().to_string());
            registry.register_definition(&name, definition)?;
            count += 1;
        }

        debug!(resource = resource.description(), count, "loaded properties definitions");
        Ok(count)
    }
}

fn apply_entry(
    definition: &mut BeanDefinition,
    bean: &str,
    attribute: &str,
    value: &str,
) -> std::result::Result<(), String> {
    let bool_value = || parse_bool(bean, attribute, value);

    match attribute {
        "(class)" => definition.class_name = Some(value.trim().to_string()),
        "(parent)" => definition.parent = Some(value.trim().to_string()),
        "(scope)" => definition.scope = Scope::parse(value.trim()),
        "(singleton)" => {
            definition.scope = if bool_value()? {
                Scope::Singleton
            } else {
                Scope::Prototype
            }
        }
        "(abstract)" => definition.abstract_definition = bool_value()?,
        "(lazy-init)" => definition.lazy_init = bool_value()?,
        "(primary)" => definition.primary = bool_value()?,
        "(depends-on)" => definition.depends_on = split_names(value),
        _ if attribute.starts_with(CONSTRUCTOR_ARG_PREFIX) => {
            let index = attribute[1..].parse::<usize>().map_err(|_| {
                format!(
                    "constructor argument key '{}.{}' must use a numeric index",
                    bean, attribute
                )
            })?;
            definition.add_constructor_arg(Some(index), literal_or_ref(value));
        }
        _ if attribute.ends_with(REF_SUFFIX) => {
            let property = &attribute[..attribute.len() - REF_SUFFIX.len()];
            if property.is_empty() {
                return Err(format!("reference key '{}.{}' has no property name", bean, attribute));
            }
            definition.set_property(property, PropertyValue::Ref(value.trim().to_string()));
        }
        _ if attribute.starts_with('(') => {
            return Err(format!("unknown attribute '{}' for bean '{}'", attribute, bean));
        }
        property => definition.set_property(property, literal_or_ref(value)),
    }
    Ok(())
}

/// `*name` は参照、`**text` はリテラル `*text`
fn literal_or_ref(value: &str) -> PropertyValue {
    match value.strip_prefix(REF_PREFIX) {
        Some(rest) if rest.starts_with(REF_PREFIX) => PropertyValue::Value(rest.to_string()),
        Some(rest) => PropertyValue::Ref(rest.trim().to_string()),
        None => PropertyValue::Value(value.to_string()),
    }
}

fn parse_bool(bean: &str, attribute: &str, value: &str) -> std::result::Result<bool, String> {
    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!(
            "'{}.{}' must be true or false, got '{}'",
            bean, attribute, other
        )),
    }
}

/// `.properties` テキストをキー・値の列に変換（出現順）
///
/// # Rules
///
/// - 先頭の空白は無視、`#` / `!` で始まる行はコメント
/// - キーは最初のエスケープされていない `=` / `:` / 空白で終わる
/// - 奇数個の `\` で終わる行は次の行に継続（次行の先頭空白は除去）
/// - エスケープ: `\t` `\n` `\r` `\f` `\uXXXX`、それ以外の `\x` は `x`
pub(crate) fn parse_properties(text: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut entries = Vec::new();
    for (line_no, line) in logical_lines(text) {
        let (raw_key, raw_value) = split_key_value(&line);
        let key = unescape(raw_key).map_err(|e| format!("line {}: {}", line_no, e))?;
        let value = unescape(raw_value).map_err(|e| format!("line {}: {}", line_no, e))?;
        entries.push((key, value));
    }
    Ok(entries)
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{0c}')
}

/// 継続行を結合した論理行（開始行番号付き）
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, natural) in text.lines().enumerate() {
        let stripped = natural.trim_start_matches(is_blank);

        let (start, mut buffer) = match pending.take() {
            Some((start, mut buffer)) => {
                buffer.push_str(stripped);
                (start, buffer)
            }
            None => {
                if stripped.is_empty() || stripped.starts_with('#') || stripped.starts_with('!') {
                    continue;
                }
                (idx + 1, stripped.to_string())
            }
        };

        let trailing = buffer.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            buffer.pop();
            pending = Some((start, buffer));
        } else {
            lines.push((start, buffer));
        }
    }

    if let Some(last) = pending {
        lines.push(last);
    }
    lines
}

/// 論理行をエスケープ済みのキー部分と値部分に分割
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                break;
            }
            c if is_blank(c) => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = line[key_end..].trim_start_matches(is_blank);
    if let Some(after) = rest.strip_prefix(['=', ':']) {
        rest = after.trim_start_matches(is_blank);
    }
    (key, rest)
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{0c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = Some(&hex)
                    .filter(|h| h.len() == 4 && h.chars().all(|c| c.is_ascii_hexdigit()))
                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                    .and_then(char::from_u32)
                    .ok_or_else(|| format!("malformed \\uXXXX escape '\\u{}'", hex))?;
                out.push(code);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
