//! ctxload
//!
//! 構成ユニットに付与したリソースインポート宣言を読み、XML や properties の
//! Bean 定義リソースを定義レジストリへ読み込む。

pub mod cli;
pub mod commands;
pub mod config;
pub mod declaration;
pub mod definition;
pub mod env;
pub mod environment;
pub mod error;
pub mod fs;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod processor;
pub mod reader;
pub mod registry;
pub mod resource;

pub use declaration::{ImportDeclaration, ReaderKind};
pub use error::{CtxError, Result};
pub use processor::{ApplicationContext, ConfigurationProcessor, ConfigurationUnit};
