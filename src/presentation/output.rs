//! Output Rendering
//!
//! Renders action reports and configuration warnings.

use crate::application::ActionReport;
use crate::config::ConfigWarning;

/// Output format for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Icons for output rendering
struct Icons {
    check: &'static str,
    cross: &'static str,
}

impl Icons {
    fn unicode() -> Self {
        Self {
            check: "✓",
            cross: "✗",
        }
    }

    fn ascii() -> Self {
        Self {
            check: "[OK]",
            cross: "[FAIL]",
        }
    }
}

/// Trait for rendering action reports
pub trait ReportRenderer {
    fn render(&self, report: &ActionReport) -> String;
}

/// Text renderer for action reports
pub struct TextRenderer {
    /// Whether to use unicode
    pub unicode: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { unicode: true }
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &ActionReport) -> String {
        let icons = if self.unicode {
            Icons::unicode()
        } else {
            Icons::ascii()
        };

        let mut out = String::new();
        if report.entries.is_empty() {
            out.push_str(&format!("{}: nothing to do\n", report.action));
            return out;
        }

        let headline = if report.is_success() {
            icons.check
        } else {
            icons.cross
        };
        out.push_str(&format!(
            "{} {}: {} succeeded, {} failed\n",
            headline,
            report.action,
            report.succeeded(),
            report.failed()
        ));

        for entry in &report.entries {
            match &entry.outcome {
                Ok(()) => out.push_str(&format!("  {} {}\n", icons.check, entry.description)),
                Err(failure) => out.push_str(&format!(
                    "  {} {}: {}\n",
                    icons.cross, entry.description, failure
                )),
            }
        }
        out
    }
}

/// JSON renderer for action reports
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &ActionReport) -> String {
        let entries: Vec<serde_json::Value> = report
            .entries
            .iter()
            .map(|entry| match &entry.outcome {
                Ok(()) => serde_json::json!({
                    "description": entry.description,
                    "success": true,
                }),
                Err(failure) => serde_json::json!({
                    "description": entry.description,
                    "success": false,
                    "kind": failure.kind(),
                    "reason": failure.to_string(),
                }),
            })
            .collect();

        let json = serde_json::json!({
            "event": "report",
            "action": report.action,
            "success": report.is_success(),
            "succeeded": report.succeeded(),
            "failed": report.failed(),
            "entries": entries,
        });
        format!("{}\n", json)
    }
}

/// Create a renderer based on format
pub fn create_renderer(format: OutputFormat, unicode: bool) -> Box<dyn ReportRenderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer { unicode }),
        OutputFormat::Json => Box::new(JsonRenderer),
    }
}

/// One-line description of a configuration warning
pub fn format_warning(warning: &ConfigWarning) -> String {
    let location = match warning.line {
        Some(line) => format!("{}:{}", warning.file.display(), line),
        None => warning.file.display().to_string(),
    };
    match &warning.suggestion {
        Some(suggestion) => format!(
            "unknown key '{}' in {} (did you mean '{}'?)",
            warning.key, location, suggestion
        ),
        None => format!("unknown key '{}' in {}", warning.key, location),
    }
}
