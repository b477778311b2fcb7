//! ctxload show コマンド
//!
//! 1 つの定義の詳細を表示する。エイリアスでも指定できる。

use super::ContextArgs;
use crate::definition::{BeanDefinition, PropertyValue};
use crate::error::{CtxError, Result};
use crate::registry::DefinitionRegistry;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

#[derive(Debug, Parser)]
pub struct Args {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Definition name or alias
    pub name: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// 出力用の定義詳細
#[derive(Debug, Serialize)]
struct DefinitionDetail<'a> {
    name: String,
    aliases: Vec<String>,
    #[serde(flatten)]
    definition: &'a BeanDefinition,
}

pub fn run(args: Args) -> Result<()> {
    let processor = args.context.processor()?;
    let context = processor.bootstrap()?;
    let detail = find_detail(context.registry(), &args.name)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print_detail(&detail);
    }

    Ok(())
}

fn find_detail<'a>(registry: &'a dyn DefinitionRegistry, name: &str) -> Result<DefinitionDetail<'a>> {
    let canonical = registry.canonical_name(name);
    let definition = registry
        .definition(&canonical)
        .ok_or_else(|| CtxError::NoSuchDefinition(name.to_string()))?;
    Ok(DefinitionDetail {
        aliases: registry.aliases(&canonical),
        name: canonical,
        definition,
    })
}

fn print_detail(detail: &DefinitionDetail<'_>) {
    let def = detail.definition;

    println!("Definition Information");
    println!("======================");
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);

    let flag = |value: bool| if value { "yes" } else { "no" };
    let list = |items: &[String]| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    };

    table.add_row(vec!["Name", detail.name.as_str()]);
    table.add_row(vec!["Aliases", &list(&detail.aliases)]);
    table.add_row(vec!["Class", def.class_name.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Parent", def.parent.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Scope", def.scope.as_str()]);
    table.add_row(vec!["Abstract", flag(def.abstract_definition)]);
    table.add_row(vec!["Lazy init", flag(def.lazy_init)]);
    table.add_row(vec!["Primary", flag(def.primary)]);
    table.add_row(vec!["Depends on", &list(&def.depends_on)]);
    table.add_row(vec!["Init method", def.init_method.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Destroy method", def.destroy_method.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Description", def.description.as_deref().unwrap_or("-")]);
    table.add_row(vec!["Source", def.source.as_deref().unwrap_or("-")]);

    println!("{table}");

    if !def.constructor_args.is_empty() {
        println!();
        println!("Constructor Arguments");
        let mut args = Table::new();
        args.load_preset(UTF8_FULL);
        args.set_header(vec!["Index", "Value"]);
        for arg in &def.constructor_args {
            let index = arg
                .index
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string());
            args.add_row(vec![index, format_value(&arg.value)]);
        }
        println!("{args}");
    }

    if !def.properties.is_empty() {
        println!();
        println!("Properties");
        let mut props = Table::new();
        props.load_preset(UTF8_FULL);
        props.set_header(vec!["Name", "Value"]);
        for (name, value) in &def.properties {
            props.add_row(vec![name.clone(), format_value(value)]);
        }
        println!("{props}");
    }
}

fn format_value(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Value(v) => v.clone(),
        PropertyValue::Ref(name) => format!("→ {}", name),
    }
}

#[cfg(test)]
#[path = "show_test.rs"]
mod tests;
