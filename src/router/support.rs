// Support-query classification
//
// A heuristic, not NLP: any case-insensitive substring hit against the
// curated keyword list flags the message as support-oriented. The trait
// exists so a real classifier can replace the keyword list later without
// touching the routing logic.

/// Decides whether a message looks like a customer-support query.
pub trait SupportClassifier: Send + Sync {
    fn is_support_query(&self, message: &str) -> bool;
}

/// Support-domain terms. A match routes the message toward the dataset
/// backend (which is trained on a support corpus).
const SUPPORT_KEYWORDS: &[&str] = &[
    "help", "support", "problem", "issue", "error", "bug", "complaint", "refund", "return",
    "cancel", "billing", "payment", "account", "login", "password", "reset", "contact", "phone",
    "email",
];

/// Default classifier: fixed keyword list, substring match.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl SupportClassifier for KeywordClassifier {
    fn is_support_query(&self, message: &str) -> bool {
        let lowered = message.to_lowercase();
        SUPPORT_KEYWORDS.iter().any(|kw| lowered.contains(kw))
    }
}
