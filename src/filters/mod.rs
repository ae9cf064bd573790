use crate::config::FilterSpec;
use crate::io::Record;

/// Pure per-record test deciding inclusion in one filtered output.
pub trait Predicate: Send + Sync {
    fn matches(&self, record: &Record) -> bool;
}

/// Matches when the record's full text contains the pattern anywhere,
/// including inside unrelated fields. Substring semantics are part of the
/// contract, not an approximation of a field-exact match.
pub struct ContainsFilter {
    pattern: String,
}

impl ContainsFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }
}

impl Predicate for ContainsFilter {
    fn matches(&self, record: &Record) -> bool {
        record.as_str().contains(&self.pattern)
    }
}

/// Matches when the field at a zero-based position parses as a number
/// strictly below the threshold. A missing or non-numeric field makes the
/// record non-matching; it is never an error.
pub struct FieldBelowFilter {
    field: usize,
    threshold: f64,
}

impl FieldBelowFilter {
    pub fn new(field: usize, threshold: f64) -> Self {
        Self { field, threshold }
    }
}

impl Predicate for FieldBelowFilter {
    fn matches(&self, record: &Record) -> bool {
        match record.field(self.field).and_then(|f| f.parse::<f64>().ok()) {
            Some(value) => value < self.threshold,
            None => false,
        }
    }
}

pub fn create_predicate(spec: &FilterSpec) -> Box<dyn Predicate> {
    match spec {
        FilterSpec::Contains { pattern } => Box::new(ContainsFilter::new(pattern.clone())),
        FilterSpec::FieldBelow { field, threshold } => {
            Box::new(FieldBelowFilter::new(*field, *threshold))
        }
    }
}
