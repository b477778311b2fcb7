/// Error codes with category prefix
///
/// Categories:
/// - CFG: Manifest and import configuration errors
/// - RES: Resource resolution errors
/// - PRS: Resource content errors raised by definition readers
/// - DEF: Registry lookups
/// - IO: File system operations
/// - VAL: Input validation errors
/// - INT: Unexpected internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Config errors (CFG001-CFG099)
    /// Invalid manifest format
    Cfg001,
    /// Import declaration without locations
    Cfg002,
    /// Unknown reader kind
    Cfg003,
    /// Unresolved placeholder
    Cfg004,
    /// Definition name conflict
    Cfg005,

    // Resource errors (RES001-RES099)
    /// Resource not found
    Res001,
    /// Unsupported scheme
    Res002,

    // Parse errors (PRS001-PRS099)
    /// Malformed resource content
    Prs001,
    /// Invalid bean definition
    Prs002,

    // Definition errors (DEF001-DEF099)
    /// Definition not found
    Def001,

    // I/O errors (IO001-IO099)
    /// File not found
    Io001,
    /// Permission denied
    Io002,

    // Validation errors (VAL001-VAL099)
    /// Invalid argument
    Val001,

    // Internal errors (INT001-INT099)
    /// Unexpected internal error
    Int001,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "CFG001")
    pub fn as_str(&self) -> &'static str {
        match self {
            // Config
            ErrorCode::Cfg001 => "CFG001",
            ErrorCode::Cfg002 => "CFG002",
            ErrorCode::Cfg003 => "CFG003",
            ErrorCode::Cfg004 => "CFG004",
            ErrorCode::Cfg005 => "CFG005",
            // Resource
            ErrorCode::Res001 => "RES001",
            ErrorCode::Res002 => "RES002",
            // Parse
            ErrorCode::Prs001 => "PRS001",
            ErrorCode::Prs002 => "PRS002",
            // Definition
            ErrorCode::Def001 => "DEF001",
            // I/O
            ErrorCode::Io001 => "IO001",
            ErrorCode::Io002 => "IO002",
            // Validation
            ErrorCode::Val001 => "VAL001",
            // Internal
            ErrorCode::Int001 => "INT001",
        }
    }

    /// Returns the general cause description
    pub fn cause(&self) -> &'static str {
        match self {
            // Config
            ErrorCode::Cfg001 => "The manifest file has an invalid format",
            ErrorCode::Cfg002 => "An import declaration does not list any resource location",
            ErrorCode::Cfg003 => "The requested definition reader is not registered",
            ErrorCode::Cfg004 => "A placeholder in a resource location has no value",
            ErrorCode::Cfg005 => "Two definitions or aliases claim the same name",
            // Resource
            ErrorCode::Res001 => "The resource location did not match any file",
            ErrorCode::Res002 => "The resource location uses a scheme that cannot be loaded",
            // Parse
            ErrorCode::Prs001 => "The resource content does not match the reader's format",
            ErrorCode::Prs002 => "A bean definition in the resource is incomplete",
            // Definition
            ErrorCode::Def001 => "No definition or alias with that name was registered",
            // I/O
            ErrorCode::Io001 => "The specified file or directory was not found",
            ErrorCode::Io002 => "Permission denied when accessing the file or directory",
            // Validation
            ErrorCode::Val001 => "An invalid argument was provided",
            // Internal
            ErrorCode::Int001 => "An unexpected internal error occurred",
        }
    }

    /// Returns remediation steps
    pub fn remediation(&self) -> &'static str {
        match self {
            // Config
            ErrorCode::Cfg001 => "1. Check the manifest syntax\n2. Use .toml, .yaml/.yml or .json as extension\n3. Compare with the manifest example in the README",
            ErrorCode::Cfg002 => "1. Add at least one entry to 'locations'\n2. Remove the empty import declaration",
            ErrorCode::Cfg003 => "1. Use 'xml' or 'properties' as reader\n2. Register custom readers before bootstrapping",
            ErrorCode::Cfg004 => "1. Define the value under [properties]\n2. Pass it with --set KEY=VALUE\n3. Export it as an environment variable",
            ErrorCode::Cfg005 => "1. Rename one of the definitions\n2. Allow overriding in [context]\n3. Check for resources imported under two names",
            // Resource
            ErrorCode::Res001 => "1. Verify the path is correct\n2. Check the classpath roots with 'ctxload resolve'\n3. Use an explicit 'file:' prefix for filesystem paths",
            ErrorCode::Res002 => "1. Use 'classpath:' or 'file:'\n2. Omit the prefix to use the default scheme",
            // Parse
            ErrorCode::Prs001 => "1. Validate the file against the reader's format\n2. Check the reader kind of the import declaration",
            ErrorCode::Prs002 => "1. Add a class or parent to the definition\n2. Check attribute values",
            // Definition
            ErrorCode::Def001 => "1. Check the definition name\n2. Use 'ctxload load' to list registered definitions",
            // I/O
            ErrorCode::Io001 => "1. Verify the file path is correct\n2. Check if the file was moved or deleted\n3. Ensure the path exists",
            ErrorCode::Io002 => "1. Check file/directory permissions\n2. Run with appropriate privileges\n3. Verify ownership of the resource",
            // Validation
            ErrorCode::Val001 => "1. Check the argument format\n2. Refer to the command help\n3. Use 'ctxload --help' for usage information",
            // Internal
            ErrorCode::Int001 => "1. Try the operation again\n2. Report the issue with debug logs",
        }
    }
}
