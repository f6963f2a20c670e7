//! Lint findings produced by the validator

use serde::{Deserialize, Serialize};

/// Whether a finding blocks compilation or is only advisory.
///
/// Severity is fixed at the point each rule is defined and is never
/// inferred from message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A diagnostic keyed by the offending field or layer id. Findings are
/// pure values; they never mutate the model description they refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub scope: String,
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.scope, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_finding_is_blocking() {
        let finding = Finding::error("trainingConfig.epochs", "epochs must be positive");
        assert!(finding.is_blocking());
        assert_eq!(finding.severity, Severity::Error);
    }

    #[test]
    fn test_warning_finding_is_advisory() {
        let finding = Finding::warning("trainingConfig.batchSize", "very small batch size");
        assert!(!finding.is_blocking());
    }

    #[test]
    fn test_finding_display() {
        let finding = Finding::error("inputConfig.inputShape", "input shape is required");
        assert_eq!(
            finding.to_string(),
            "error [inputConfig.inputShape]: input shape is required"
        );
    }

    #[test]
    fn test_severity_serialization() {
        assert_eq!(serde_json::to_string(&Severity::Error).unwrap(), "\"error\"");
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
    }

    #[test]
    fn test_finding_serialization() {
        let finding = Finding::warning("layer-2", "dropout rate above 0.7");
        let json = serde_json::to_string(&finding).unwrap();

        assert!(json.contains("\"scope\":\"layer-2\""));
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("dropout rate above 0.7"));
    }
}
