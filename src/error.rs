pub mod code;
pub mod formatter;
pub mod rich;

use thiserror::Error;

/// ctxload 統一エラー型
#[derive(Debug, Error)]
pub enum CtxError {
    #[error("Import declaration on '{unit}' has no resource locations")]
    EmptyLocators { unit: String },

    #[error("Cannot resolve resource location '{locator}': {reason}")]
    UnresolvableLocator { locator: String, reason: String },

    #[error("Unsupported resource scheme '{scheme}:' in '{locator}'")]
    UnsupportedScheme { scheme: String, locator: String },

    #[error("No definition reader registered for kind '{0}'")]
    UnknownReader(String),

    #[error("Could not resolve placeholder '{placeholder}' in '{value}'")]
    UnresolvedPlaceholder { placeholder: String, value: String },

    #[error("Cannot register definition '{name}': {reason}")]
    DefinitionConflict { name: String, reason: String },

    #[error("Invalid definition '{name}': {reason}")]
    InvalidDefinition { name: String, reason: String },

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to parse {resource}: {message}")]
    ResourceParse { resource: String, message: String },

    #[error("No definition named '{0}'")]
    NoSuchDefinition(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CtxError>;

impl CtxError {
    /// リソースの内容不正を表すエラーを作成
    pub fn parse(resource: impl Into<String>, message: impl Into<String>) -> Self {
        CtxError::ResourceParse {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// 構成の誤りに起因するエラーかどうか
    ///
    /// ロケーション未解決・リーダー種別不明・定義の衝突などが該当する。
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CtxError::EmptyLocators { .. }
                | CtxError::UnresolvableLocator { .. }
                | CtxError::UnsupportedScheme { .. }
                | CtxError::UnknownReader(_)
                | CtxError::UnresolvedPlaceholder { .. }
                | CtxError::DefinitionConflict { .. }
                | CtxError::InvalidDefinition { .. }
                | CtxError::InvalidManifest(_)
                | CtxError::Configuration(_)
        )
    }

    /// リーダーがリソース内容を解釈できなかったかどうか
    pub fn is_parse_error(&self) -> bool {
        matches!(self, CtxError::ResourceParse { .. })
    }
}
