use crate::cli::{Cli, Command};
use crate::config::LoaderConfig;
use crate::error::{CtxError, Result};
use crate::manifest::ManifestFile;
use crate::processor::ConfigurationProcessor;
use crate::resource::DefaultScheme;
use std::path::PathBuf;

pub mod load;
pub mod resolve;
pub mod show;

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Load(args) => load::run(args),
        Command::Show(args) => show::run(args),
        Command::Resolve(args) => resolve::run(args),
    }
}

/// マニフェストと上書き設定（全サブコマンド共通）
#[derive(Debug, Clone, clap::Args)]
pub struct ContextArgs {
    /// Manifest file (.toml, .yaml/.yml or .json)
    pub manifest: PathBuf,

    /// Extra class path root, searched before the manifest's roots (repeatable)
    #[arg(long = "classpath", value_name = "DIR")]
    pub classpath: Vec<PathBuf>,

    /// Placeholder value, overrides [properties] (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Scheme for locations without a prefix, overrides the manifest
    #[arg(long, value_enum, value_name = "SCHEME")]
    pub default_scheme: Option<DefaultScheme>,

    /// Fail when a definition name is registered twice
    #[arg(long)]
    pub no_overriding: bool,
}

impl ContextArgs {
    /// 設定を組み立てたプロセッサ
    ///
    /// 優先順位: マニフェスト < 環境変数 < CLI 引数
    pub fn processor(&self) -> Result<ConfigurationProcessor> {
        let file = ManifestFile::load(&self.manifest)?;
        let config = self.apply(file.loader_config()?);

        let mut environment = file.environment();
        for raw in &self.set {
            let (key, value) = parse_assignment(raw)?;
            environment.set_property(key, value);
        }

        Ok(file.processor(&config, environment))
    }

    fn apply(&self, mut config: LoaderConfig) -> LoaderConfig {
        if !self.classpath.is_empty() {
            let mut roots = self.classpath.clone();
            roots.append(&mut config.classpath);
            config.classpath = roots;
        }
        if let Some(scheme) = self.default_scheme {
            config = config.with_default_scheme(scheme);
        }
        if self.no_overriding {
            config = config.with_overriding(false);
        }
        config
    }
}

/// `KEY=VALUE` を分解
pub(crate) fn parse_assignment(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(CtxError::InvalidArgument(format!(
            "expected KEY=VALUE, got '{}'",
            raw
        ))),
    }
}
