//! ctxload load コマンド
//!
//! マニフェストの全ユニットを読み込み、登録された定義の一覧を表示する。

use super::ContextArgs;
use crate::error::Result;
use crate::output::CommandSummary;
use crate::processor::{ApplicationContext, BootstrapReport};
use crate::registry::DefinitionRegistry;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(after_help = "OUTPUT FORMATS:\n  \
    (default)  table of name, class, scope and source resource\n  \
    --json     definitions and the load report as JSON\n  \
    --simple   one definition name per line")]
pub struct Args {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Output in JSON format
    #[arg(long, conflicts_with = "simple")]
    pub json: bool,

    /// Output only definition names
    #[arg(long, conflicts_with = "json")]
    pub simple: bool,
}

/// 一覧の 1 行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct DefinitionRow {
    name: String,
    aliases: Vec<String>,
    class: Option<String>,
    scope: String,
    #[serde(rename = "abstract")]
    abstract_definition: bool,
    source: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoadOutput<'a> {
    definitions: &'a [DefinitionRow],
    report: &'a BootstrapReport,
}

pub fn run(args: Args) -> Result<()> {
    let processor = args.context.processor()?;
    let context = processor.bootstrap()?;
    let rows = collect_rows(&context);

    if args.json {
        print_json(&rows, context.report())?;
    } else if args.simple {
        print_simple(&rows);
    } else {
        print_table(&rows);
        println!("{}", CommandSummary::from_report(context.report(), rows.len()));
    }

    Ok(())
}

/// 登録順の行
fn collect_rows(context: &ApplicationContext) -> Vec<DefinitionRow> {
    let registry = context.registry();
    registry
        .definition_names()
        .into_iter()
        .filter_map(|name| {
            let definition = registry.definition(&name)?;
            Some(DefinitionRow {
                aliases: registry.aliases(&name),
                class: definition
                    .class_name
                    .clone()
                    .or_else(|| definition.parent.as_ref().map(|p| format!("(parent: {})", p))),
                scope: definition.scope.to_string(),
                abstract_definition: definition.abstract_definition,
                source: definition.source.clone(),
                name,
            })
        })
        .collect()
}

fn print_table(rows: &[DefinitionRow]) {
    if rows.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Class", "Scope", "Source"]);

    for row in rows {
        let name = if row.aliases.is_empty() {
            row.name.clone()
        } else {
            format!("{} ({})", row.name, row.aliases.join(", "))
        };
        let scope = if row.abstract_definition {
            format!("{} (abstract)", row.scope)
        } else {
            row.scope.clone()
        };

        table.add_row(vec![
            name.as_str(),
            row.class.as_deref().unwrap_or("-"),
            scope.as_str(),
            row.source.as_deref().unwrap_or("-"),
        ]);
    }

    println!("{table}");
}

fn print_json(rows: &[DefinitionRow], report: &BootstrapReport) -> Result<()> {
    let output = LoadOutput {
        definitions: rows,
        report,
    };
    let json = serde_json::to_string_pretty(&output)?;
    println!("{json}");
    Ok(())
}

fn print_simple(rows: &[DefinitionRow]) {
    for row in rows {
        println!("{}", row.name);
    }
}

#[cfg(test)]
#[path = "load_test.rs"]
mod tests;
