use std::error::Error;
use std::io::IsTerminal;

use owo_colors::OwoColorize;
use regex::Regex;

use super::rich::RichError;

/// Formats RichError for CLI output
pub struct ErrorFormatter {
    verbose: bool,
    use_color: bool,
}

impl ErrorFormatter {
    /// Creates a new ErrorFormatter with default TTY detection
    pub fn new(verbose: bool) -> Self {
        Self::with_color_detection(verbose, Self::default_should_use_color)
    }

    /// Creates a new ErrorFormatter with injectable TTY detection for testing
    pub fn with_color_detection(verbose: bool, detect_color: fn() -> bool) -> Self {
        let use_color = detect_color();
        Self { verbose, use_color }
    }

    fn default_should_use_color() -> bool {
        std::io::stderr().is_terminal() && std::env::var("NO_COLOR").is_err()
    }

    /// Formats the error for display
    pub fn format(&self, error: &RichError) -> String {
        let mut plain = format!("error[{}]: {}", error.code().as_str(), error.message());

        let context_lines = self.format_context(error);
        if !context_lines.is_empty() {
            plain.push('\n');
            plain.push_str(&context_lines);
        }

        if self.verbose {
            self.append_verbose(&mut plain, error);
        }

        // Apply masking before color
        let masked = Self::mask_credentials(&plain);

        if self.use_color {
            self.apply_color(&masked)
        } else {
            masked
        }
    }

    fn append_verbose(&self, output: &mut String, error: &RichError) {
        output.push_str("\n  |");
        output.push_str(&format!("\n  | Cause: {}", error.code().cause()));

        output.push_str("\n  |");
        output.push_str("\n  | Remediation:");
        for line in error.code().remediation().lines() {
            output.push_str(&format!("\n  |   {}", line));
        }

        let source_chain = self.format_source_chain(error);
        if !source_chain.is_empty() {
            output.push_str("\n  |");
            output.push_str(&format!("\n  | Source chain:\n{}", source_chain));
        }

        output.push_str("\n  |");
        output.push_str("\n  = note: use `ctxload --help` for more information");
    }

    fn format_context(&self, error: &RichError) -> String {
        let ctx = error.context();
        let mut lines = Vec::new();

        // Display order: locator -> definition -> additional (sorted)
        if let Some(locator) = &ctx.locator {
            lines.push(format!("  --> location: {}", locator));
        }

        if let Some(name) = &ctx.definition {
            lines.push(format!("  --> definition: {}", name));
        }

        for (key, value) in &ctx.additional {
            lines.push(format!("  --> {}: {}", key, value));
        }

        lines.join("\n")
    }

    fn format_source_chain(&self, error: &RichError) -> String {
        let mut chain = Vec::new();
        let mut current: Option<&(dyn std::error::Error + 'static)> = error.source();

        while let Some(err) = current {
            chain.push(format!("  |   - {}", err));
            current = err.source();
        }

        chain.join("\n")
    }

    /// Masks credential-like `key=value` pairs (e.g. inside JDBC URLs)
    fn mask_credentials(text: &str) -> String {
        let Ok(re) = Regex::new(r"(?i)\b(password|passwd|pwd|secret|token)=([^&\s;,\]]+)") else {
            return text.to_string();
        };
        re.replace_all(text, "$1=***").to_string()
    }

    fn apply_color(&self, text: &str) -> String {
        let mut result = String::new();

        for line in text.lines() {
            if !result.is_empty() {
                result.push('\n');
            }

            if line.starts_with("error[") {
                let bracket_end = line.find(']').map(|i| i + 1).unwrap_or(0);
                let error_prefix = &line[..bracket_end];
                let rest = &line[bracket_end..];
                result.push_str(&format!("{}{}", error_prefix.red().bold(), rest.bold()));
            } else if line.starts_with("  -->") {
                result.push_str(&line.blue().to_string());
            } else if line.starts_with("  | Cause:") {
                result.push_str(&line.yellow().to_string());
            } else if line.starts_with("  | Remediation:") {
                result.push_str(&line.green().to_string());
            } else if line.starts_with("  = note:") || line.starts_with("  |   -") {
                result.push_str(&line.dimmed().to_string());
            } else {
                result.push_str(line);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code::ErrorCode;
    use crate::error::rich::ErrorContext;

    fn no_color() -> bool {
        false
    }

    #[test]
    fn format_simple() {
        let formatter = ErrorFormatter::with_color_detection(false, no_color);
        let error = RichError::new(ErrorCode::Res001, "Cannot resolve resource location");

        let output = formatter.format(&error);
        assert!(output.contains("error[RES001]"));
        assert!(output.contains("Cannot resolve resource location"));
        assert!(!output.contains("Cause:"));
    }

    #[test]
    fn format_simple_with_context() {
        let formatter = ErrorFormatter::with_color_detection(false, no_color);
        let context = ErrorContext::new().with_locator("classpath:missing.xml");
        let error = RichError::new(ErrorCode::Res001, "not found").with_context(context);

        let output = formatter.format(&error);
        assert!(output.contains("  --> location: classpath:missing.xml"));
    }

    #[test]
    fn format_verbose() {
        let formatter = ErrorFormatter::with_color_detection(true, no_color);
        let error = RichError::new(ErrorCode::Cfg003, "No reader");

        let output = formatter.format(&error);
        assert!(output.contains("error[CFG003]"));
        assert!(output.contains("Cause:"));
        assert!(output.contains("Remediation:"));
        assert!(output.contains("note: use `ctxload --help`"));
    }

    #[test]
    fn masks_credentials_in_values() {
        let formatter = ErrorFormatter::with_color_detection(false, no_color);
        let error = RichError::new(
            ErrorCode::Prs002,
            "Invalid value jdbc:postgresql://db/app?user=app&password=hunter2",
        );

        let output = formatter.format(&error);
        assert!(output.contains("password=***"), "output was: {}", output);
        assert!(!output.contains("hunter2"), "output was: {}", output);
        assert!(output.contains("user=app"), "output was: {}", output);
    }

    #[test]
    fn context_display_order() {
        let formatter = ErrorFormatter::with_color_detection(false, no_color);
        let context = ErrorContext::new()
            .with_definition("dataSource")
            .with_locator("classpath:db.xml")
            .with_additional("extra", "value");

        let error = RichError::new(ErrorCode::Int001, "Test error").with_context(context);
        let output = formatter.format(&error);

        let locator_pos = output.find("location: classpath:db.xml").unwrap();
        let def_pos = output.find("definition: dataSource").unwrap();
        let extra_pos = output.find("extra: value").unwrap();

        assert!(locator_pos < def_pos);
        assert!(def_pos < extra_pos);
    }

    #[test]
    fn verbose_includes_source_chain() {
        let formatter = ErrorFormatter::with_color_detection(true, no_color);
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "underlying error");
        let error = RichError::new(ErrorCode::Io001, "Failed to read file").with_source(io_error);

        let output = formatter.format(&error);
        assert!(output.contains("Source chain:"));
        assert!(output.contains("underlying error"));
    }

    #[test]
    fn no_color_has_no_ansi_codes() {
        let formatter = ErrorFormatter::with_color_detection(false, || false);
        let error = RichError::new(ErrorCode::Val001, "Test");
        let output = formatter.format(&error);

        assert!(!output.contains("\x1b["));
    }
}
