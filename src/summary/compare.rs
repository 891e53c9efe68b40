use crate::types::{Change, ComparisonRow, Severity, ViolationRecord};
use std::collections::HashMap;
use tracing::{debug, warn};

type RuleKey = (Severity, String);

/// Records keyed by (severity, rule name), keeping first-insertion order
///
/// A repeated key keeps its original position but takes the later value.
#[derive(Default)]
struct RuleMap {
    order: Vec<RuleKey>,
    entries: HashMap<RuleKey, (String, String)>,
}

impl RuleMap {
    fn from_records(records: &[ViolationRecord]) -> Self {
        let mut map = Self::default();
        for record in records {
            let key = (record.severity, record.rule_name.clone());
            let value = (record.count.clone(), record.short_help.clone());
            if map.entries.insert(key.clone(), value).is_some() {
                warn!(
                    "Duplicate rule {} {} in summary, keeping the last occurrence",
                    record.severity, record.rule_name
                );
            } else {
                map.order.push(key);
            }
        }
        map
    }

    fn contains(&self, key: &RuleKey) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &RuleKey) -> Option<&(String, String)> {
        self.entries.get(key)
    }

    fn iter(&self) -> impl Iterator<Item = (&RuleKey, &(String, String))> {
        self.order.iter().map(|key| (key, &self.entries[key]))
    }
}

fn row(key: &RuleKey, (count, short_help): &(String, String), change: Change) -> ComparisonRow {
    ComparisonRow {
        severity: key.0,
        rule_name: key.1.clone(),
        count: count.clone(),
        short_help: short_help.clone(),
        change,
    }
}

/// Compare baseline and new summaries rule by rule
///
/// Deleted rules come first in baseline order, followed by every rule of the
/// new summary in its own order. Rows are then stably grouped by severity.
pub fn compare(baseline: &[ViolationRecord], new: &[ViolationRecord]) -> Vec<ComparisonRow> {
    let baseline_map = RuleMap::from_records(baseline);
    let new_map = RuleMap::from_records(new);

    let mut rows = Vec::new();

    for (key, value) in baseline_map.iter() {
        if !new_map.contains(key) {
            rows.push(row(key, value, Change::Deleted));
        }
    }

    for (key, value) in new_map.iter() {
        let change = match baseline_map.get(key) {
            None => Change::New,
            Some((baseline_count, _)) if *baseline_count == value.0 => Change::Same,
            Some((baseline_count, _)) => Change::CountChanged {
                from: baseline_count.clone(),
                to: value.0.clone(),
            },
        };
        rows.push(row(key, value, change));
    }

    rows.sort_by_key(|r| r.severity.rank());
    debug!("Compared summaries into {} rows", rows.len());
    rows
}
