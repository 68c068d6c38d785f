//! Action Report
//!
//! Per-payload outcome of one action run.

use super::failure::ActionFailure;

#[derive(Debug)]
pub struct ReportEntry {
    pub description: String,
    pub outcome: Result<(), ActionFailure>,
}

impl ReportEntry {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Result of running an action
#[derive(Debug)]
pub struct ActionReport {
    pub action: &'static str,
    pub entries: Vec<ReportEntry>,
}

impl ActionReport {
    pub fn new(action: &'static str) -> Self {
        Self {
            action,
            entries: Vec::new(),
        }
    }

    pub fn record_success(&mut self, description: impl Into<String>) {
        self.entries.push(ReportEntry {
            description: description.into(),
            outcome: Ok(()),
        });
    }

    pub fn record_failure(&mut self, description: impl Into<String>, failure: ActionFailure) {
        self.entries.push(ReportEntry {
            description: description.into(),
            outcome: Err(failure),
        });
    }

    /// True when nothing failed
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(ReportEntry::is_success)
    }

    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|e| e.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ActionFailure)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|f| (e.description.as_str(), f)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_success() {
        let report = ActionReport::new("deploy");
        assert!(report.is_success());
        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 0);
    }

    #[test]
    fn one_failure_fails_the_report() {
        let mut report = ActionReport::new("deploy");
        report.record_success("deploy v1 to web:acme:dev");
        report.record_failure(
            "deploy v1 to web:acme:prod",
            ActionFailure::PayloadInvalid {
                reason: "x".to_string(),
            },
        );

        assert!(!report.is_success());
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);

        let failures: Vec<_> = report.failures().map(|(d, f)| (d, f.kind())).collect();
        assert_eq!(failures, vec![("deploy v1 to web:acme:prod", "payload_invalid")]);
    }
}
