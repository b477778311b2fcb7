use std::collections::BTreeMap;

use super::code::ErrorCode;
use super::CtxError;

/// Structured context for error display
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub locator: Option<String>,
    pub definition: Option<String>,
    /// Additional key-value pairs for context (BTreeMap for deterministic ordering)
    pub additional: BTreeMap<String, String>,
}

impl ErrorContext {
    /// Creates a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource locator
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    /// Sets the definition name
    pub fn with_definition(mut self, name: impl Into<String>) -> Self {
        self.definition = Some(name.into());
        self
    }

    /// Adds an additional key-value pair
    pub fn with_additional(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional.insert(key.into(), value.into());
        self
    }

    /// Returns true if the context has any data
    pub fn is_empty(&self) -> bool {
        self.locator.is_none()
            && self.definition.is_none()
            && self.additional.is_empty()
    }
}

/// Rich error with code, message, and context
pub struct RichError {
    code: ErrorCode,
    message: String,
    context: ErrorContext,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Debug for RichError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RichError")
            .field("code", &self.code)
            .field("message", &self.message)
            .field("context", &self.context)
            .field("source", &self.source.as_ref().map(|e| e.to_string()))
            .finish()
    }
}

impl RichError {
    /// Creates a new RichError with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Sets the error context
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    /// Sets the source error
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the error context
    pub fn context(&self) -> &ErrorContext {
        &self.context
    }
}

impl std::fmt::Display for RichError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for RichError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<CtxError> for RichError {
    fn from(err: CtxError) -> Self {
        let message = err.to_string();
        match err {
            CtxError::EmptyLocators { unit } => RichError::new(ErrorCode::Cfg002, message)
                .with_context(ErrorContext::new().with_additional("unit", unit)),
            CtxError::UnresolvableLocator { locator, .. } => {
                RichError::new(ErrorCode::Res001, message)
                    .with_context(ErrorContext::new().with_locator(locator))
            }
            CtxError::UnsupportedScheme { locator, .. } => {
                RichError::new(ErrorCode::Res002, message)
                    .with_context(ErrorContext::new().with_locator(locator))
            }
            CtxError::UnknownReader(kind) => RichError::new(ErrorCode::Cfg003, message)
                .with_context(ErrorContext::new().with_additional("reader", kind)),
            CtxError::UnresolvedPlaceholder { value, .. } => {
                RichError::new(ErrorCode::Cfg004, message)
                    .with_context(ErrorContext::new().with_locator(value))
            }
            CtxError::DefinitionConflict { name, .. } => {
                RichError::new(ErrorCode::Cfg005, message)
                    .with_context(ErrorContext::new().with_definition(name))
            }
            CtxError::InvalidDefinition { name, .. } => {
                RichError::new(ErrorCode::Prs002, message)
                    .with_context(ErrorContext::new().with_definition(name))
            }
            CtxError::InvalidManifest(_) | CtxError::Configuration(_) => {
                RichError::new(ErrorCode::Cfg001, message)
            }
            CtxError::ResourceParse { resource, .. } => RichError::new(ErrorCode::Prs001, message)
                .with_context(ErrorContext::new().with_additional("resource", resource)),
            CtxError::NoSuchDefinition(name) => RichError::new(ErrorCode::Def001, message)
                .with_context(ErrorContext::new().with_definition(name)),
            CtxError::InvalidArgument(_) => RichError::new(ErrorCode::Val001, message),
            CtxError::Io(e) => {
                let code = match e.kind() {
                    std::io::ErrorKind::NotFound => ErrorCode::Io001,
                    std::io::ErrorKind::PermissionDenied => ErrorCode::Io002,
                    _ => ErrorCode::Int001,
                };
                RichError::new(code, message).with_source(e)
            }
            CtxError::Toml(e) => RichError::new(ErrorCode::Cfg001, message).with_source(e),
            CtxError::Yaml(e) => RichError::new(ErrorCode::Cfg001, message).with_source(e),
            CtxError::Json(e) => RichError::new(ErrorCode::Cfg001, message).with_source(e),
        }
    }
}
