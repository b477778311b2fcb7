use clap::{Parser, Subcommand};

use crate::commands::{load, resolve, show};

#[derive(Debug, Parser)]
#[command(name = "ctxload")]
#[command(about = "Bean definition import CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging and detailed error output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// マニフェストを読み込み、定義の一覧を表示
    Load(load::Args),

    /// 1 つの定義の詳細を表示
    Show(show::Args),

    /// ロケーションが解決されるリソースを表示
    Resolve(resolve::Args),
}
