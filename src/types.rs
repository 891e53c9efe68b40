use std::fmt;
use std::str::FromStr;

/// Severity level of a lint rule as printed in the summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Sort rank used for report ordering (ERROR first)
    pub fn rank(self) -> u8 {
        match self {
            Self::Error => 1,
            Self::Warning => 2,
            Self::Info => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A severity keyword outside ERROR, WARNING and INFO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeverity(pub String);

impl fmt::Display for UnknownSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown severity '{}'", self.0)
    }
}

impl std::error::Error for UnknownSeverity {}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ERROR" => Ok(Self::Error),
            "WARNING" => Ok(Self::Warning),
            "INFO" => Ok(Self::Info),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// One rule category from a lint summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationRecord {
    pub severity: Severity,
    /// Rule identifier, unique per severity within one summary
    pub rule_name: String,
    /// Violation count, kept as printed
    pub count: String,
    /// Rule description, continuation lines joined with a space
    pub short_help: String,
}

/// Outcome of comparing one rule between baseline and new summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

/// Per-rule change between baseline and new summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Rule only present in the baseline
    Deleted,
    /// Rule only present in the new summary
    New,
    Same,
    CountChanged { from: String, to: String },
}

impl Change {
    /// New rules and count changes fail; removals and unchanged rules pass
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Deleted | Self::Same => Verdict::Pass,
            Self::New | Self::CountChanged { .. } => Verdict::Fail,
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deleted => f.write_str("Deleted"),
            Self::New => f.write_str("NEW"),
            Self::Same => f.write_str("SAME"),
            Self::CountChanged { from, to } => write!(f, "Count changed from {} to {}", from, to),
        }
    }
}

/// A single line of the comparison table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub severity: Severity,
    pub rule_name: String,
    pub count: String,
    pub short_help: String,
    pub change: Change,
}

impl ComparisonRow {
    pub fn verdict(&self) -> Verdict {
        self.change.verdict()
    }

    /// Text shown in the DIFF column
    pub fn status_label(&self) -> String {
        self.change.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::Error.rank() < Severity::Warning.rank());
        assert!(Severity::Warning.rank() < Severity::Info.rank());
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("WARNING".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(
            "FATAL".parse::<Severity>(),
            Err(UnknownSeverity("FATAL".into()))
        );
        assert!("error".parse::<Severity>().is_err());
    }

    #[test]
    fn test_change_labels() {
        assert_eq!(Change::Deleted.to_string(), "Deleted");
        assert_eq!(Change::New.to_string(), "NEW");
        assert_eq!(Change::Same.to_string(), "SAME");
        let changed = Change::CountChanged {
            from: "5".into(),
            to: "7".into(),
        };
        assert_eq!(changed.to_string(), "Count changed from 5 to 7");
    }

    #[test]
    fn test_change_verdicts() {
        assert_eq!(Change::Deleted.verdict(), Verdict::Pass);
        assert_eq!(Change::Same.verdict(), Verdict::Pass);
        assert_eq!(Change::New.verdict(), Verdict::Fail);
        let changed = Change::CountChanged {
            from: "1".into(),
            to: "2".into(),
        };
        assert_eq!(changed.verdict(), Verdict::Fail);
    }
}
