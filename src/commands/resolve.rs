//! ctxload resolve コマンド
//!
//! ロケーションがどのリソースに解決されるかを表示する（読み込みはしない）。

use super::ContextArgs;
use crate::error::Result;
use crate::resource::{Origin, Resource, ResourceLoader};
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

#[derive(Debug, Parser)]
pub struct Args {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Resource location, e.g. classpath:beans/*.xml
    pub locator: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// 解決結果の 1 行
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ResolvedRow {
    description: String,
    origin: &'static str,
    path: Option<String>,
    size: usize,
}

impl ResolvedRow {
    fn from_resource(resource: &Resource) -> Self {
        Self {
            description: resource.description().to_string(),
            origin: match resource.origin() {
                Origin::Classpath(_) => "classpath",
                Origin::File => "file",
                Origin::Memory => "memory",
            },
            path: resource.path().map(|p| p.display().to_string()),
            size: resource.content().len(),
        }
    }
}

pub fn run(args: Args) -> Result<()> {
    let processor = args.context.processor()?;
    let location = processor
        .environment()
        .resolve_placeholders(&args.locator)?;
    let rows: Vec<ResolvedRow> = processor
        .loader()
        .resolve(&location)?
        .iter()
        .map(ResolvedRow::from_resource)
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_table(&location, &rows);
    }

    Ok(())
}

fn print_table(location: &str, rows: &[ResolvedRow]) {
    if rows.is_empty() {
        println!("No resources matched '{}'", location);
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Resource", "Path", "Bytes"]);

    for row in rows {
        table.add_row(vec![
            row.description.clone(),
            row.path.clone().unwrap_or_else(|| "-".to_string()),
            row.size.to_string(),
        ]);
    }

    println!("{table}");
    println!("{} resource(s)", rows.len());
}
