use crate::types::{Severity, ViolationRecord};
use anyhow::Context;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// `<SEVERITY> <rule> <count> <short help>`
static RECORD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ERROR|WARNING|INFO)\s+(\S+)\s+(\d+)\s+(.+)$").expect("valid record regex")
});

/// Indented line continuing the previous record's short help
static CONTINUATION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ +(.*)$").expect("valid continuation regex"));

/// Read a summary file and extract its violation records in file order
pub fn extract(path: impl AsRef<Path>) -> anyhow::Result<Vec<ViolationRecord>> {
    let path = path.as_ref();
    debug!("Reading summary {}", path.display());
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read summary {}", path.display()))?;
    let records = extract_from_str(&content);
    debug!("Extracted {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Extract violation records from summary text
pub fn extract_from_str(content: &str) -> Vec<ViolationRecord> {
    let mut parser = Parser::default();
    for line in content.lines() {
        parser.feed(line);
    }
    parser.records
}

#[derive(Default)]
struct Parser {
    records: Vec<ViolationRecord>,
}

impl Parser {
    fn feed(&mut self, line: &str) {
        if let Some(caps) = CONTINUATION_LINE.captures(line) {
            // Indented text before the first record has nothing to attach to
            if let Some(last) = self.records.last_mut() {
                last.short_help.push(' ');
                last.short_help.push_str(&caps[1]);
            } else {
                trace!("Ignoring continuation line before first record: {:?}", line);
            }
        }

        if let Some(caps) = RECORD_LINE.captures(line) {
            let Ok(severity) = caps[1].parse::<Severity>() else {
                return;
            };
            self.records.push(ViolationRecord {
                severity,
                rule_name: caps[2].to_string(),
                count: caps[3].to_string(),
                short_help: caps[4].to_string(),
            });
        }
    }
}
