use agrid_core::IntentCategory;
use once_cell::sync::Lazy;
use regex::Regex;

/// Default patterns, in evaluation order.
pub const DEFAULT_PATTERNS: &[(IntentCategory, &str)] = &[
    (
        IntentCategory::Greeting,
        r"(?i)\b(hello|hi|hey|greetings?|good morning|good afternoon|good evening)\b",
    ),
    (
        IntentCategory::Status,
        r"(?i)\b(how are you|how're you|how do you do|what's up|how's it going)\b",
    ),
    (
        IntentCategory::Farewell,
        r"(?i)\b(bye|goodbye|see you|farewell|take care|gtg|got to go)\b",
    ),
    (
        IntentCategory::HelpRequest,
        r"(?i)\b(help|assist|support|what can you do|capabilities|diagnose|disease|pest|crop|plant|farming)\b",
    ),
];

static COMPILED_DEFAULTS: Lazy<Vec<(IntentCategory, Regex)>> = Lazy::new(|| {
    DEFAULT_PATTERNS
        .iter()
        .filter_map(|(category, pattern)| {
            Regex::new(pattern).ok().map(|regex| (*category, regex))
        })
        .collect()
});

/// Rule-based intent classifier.
///
/// Patterns are evaluated in a fixed order and the first category whose
/// pattern matches anywhere in the text wins. Text that matches nothing is
/// [`IntentCategory::Unmatched`].
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    patterns: Vec<(IntentCategory, Regex)>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Classifier with the default agricultural patterns.
    pub fn new() -> Self {
        Self {
            patterns: COMPILED_DEFAULTS.clone(),
        }
    }

    /// Classifier with custom patterns, evaluated in slice order.
    pub fn with_patterns(patterns: &[(IntentCategory, &str)]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|(category, pattern)| Regex::new(pattern).map(|regex| (*category, regex)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn classify(&self, text: &str) -> IntentCategory {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(category, _)| *category)
            .unwrap_or(IntentCategory::Unmatched)
    }
}
