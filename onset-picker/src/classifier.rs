//! Trial outcome classification
//!
//! Rules are evaluated in order and the first match wins. The default rule set
//! covers three of the four (stop signal, correctness) combinations; the
//! remaining one (no stop cue, incorrect response) matches nothing.

use crate::types::{Category, Flag, TrialRecord};

/// A predicate over a trial record
pub type Predicate = fn(&TrialRecord) -> bool;

/// One classification rule: records matching `predicate` belong to `category`
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub category: Category,
    pub predicate: Predicate,
}

pub fn is_failed_stop(record: &TrialRecord) -> bool {
    record.stop_signal == Flag::Yes && record.is_correct == Flag::No
}

pub fn is_successful_stop(record: &TrialRecord) -> bool {
    record.stop_signal == Flag::Yes && record.is_correct == Flag::Yes
}

pub fn is_go_correct(record: &TrialRecord) -> bool {
    record.stop_signal == Flag::No && record.is_correct == Flag::Yes
}

/// Default rules, in priority order
pub const DEFAULT_RULES: [ClassificationRule; 3] = [
    ClassificationRule {
        category: Category::FailedStop,
        predicate: is_failed_stop,
    },
    ClassificationRule {
        category: Category::SuccessfulStop,
        predicate: is_successful_stop,
    },
    ClassificationRule {
        category: Category::GoCorrect,
        predicate: is_go_correct,
    },
];

/// Ordered rule list mapping trial records to categories
#[derive(Debug, Clone)]
pub struct RowClassifier {
    rules: Vec<ClassificationRule>,
}

impl RowClassifier {
    pub fn new() -> Self {
        Self::with_rules(DEFAULT_RULES.to_vec())
    }

    /// Build a classifier from a custom rule list (evaluated in the given order)
    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassificationRule] {
        &self.rules
    }

    /// Category of the first rule matching `record`, or None
    pub fn classify(&self, record: &TrialRecord) -> Option<Category> {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(record))
            .map(|rule| rule.category)
    }
}

impl Default for RowClassifier {
    fn default() -> Self {
        Self::new()
    }
}
