use crate::processor::BootstrapReport;
use owo_colors::OwoColorize;

pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    pub fn format(definitions: usize, resources: usize, skipped: usize) -> Self {
        let skipped_note = if skipped > 0 {
            format!(", {} duplicate(s) skipped", skipped.yellow())
        } else {
            String::new()
        };

        match (definitions, resources) {
            (d, r) if d > 0 => Self {
                prefix: "✓".green().to_string(),
                message: format!(
                    "{} definition(s) loaded from {} resource(s){}",
                    d.green(),
                    r,
                    skipped_note
                ),
            },
            (_, r) if r > 0 => Self {
                prefix: "•".yellow().to_string(),
                message: format!("{} resource(s) loaded, no definitions{}", r, skipped_note),
            },
            _ => Self {
                prefix: "•".yellow().to_string(),
                message: "No resources loaded".to_string(),
            },
        }
    }

    pub fn from_report(report: &BootstrapReport, definitions: usize) -> Self {
        Self::format(definitions, report.resource_count(), report.skip_count())
    }
}

impl std::fmt::Display for CommandSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.prefix, self.message)
    }
}
