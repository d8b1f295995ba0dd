//! Keyword classifier: ordered rules, first match wins.

use ablage_core::DocumentType;

/// One classification rule. A rule matches when any trigger occurs in the
/// lowercased text.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub label: DocumentType,
    pub triggers: &'static [&'static str],
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t))
    }
}

/// Rules in priority order.
///
/// The extra Kündigung spellings cover UTF-8 text that went through a
/// Latin-1 or Mac Roman decode somewhere upstream, and plain-ASCII scans.
pub const RULES: &[Rule] = &[
    Rule {
        label: DocumentType::Invoice,
        triggers: &["rechnung"],
    },
    Rule {
        label: DocumentType::Notice,
        triggers: &["bescheid"],
    },
    Rule {
        label: DocumentType::Termination,
        triggers: &["kündigung", "kã¼ndigung", "k√ºndigung", "kuendigung"],
    },
];

/// Label used when no rule matches.
pub const DEFAULT_LABEL: DocumentType = DocumentType::Miscellaneous;

/// Classify text by the first matching rule in [`RULES`].
pub fn classify(text: &str) -> DocumentType {
    classify_with(RULES, text)
}

pub fn classify_with(rules: &[Rule], text: &str) -> DocumentType {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.label)
        .unwrap_or(DEFAULT_LABEL)
}
