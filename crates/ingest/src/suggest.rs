use std::path::Path;

use kakeibo_core::TransactionRecord;

/// Fallback category source consulted only when no rule matched. The real
/// deployment may back this with a model call; the core treats it as a black
/// box returning a single label or nothing.
pub trait SuggestionProvider {
    fn suggest(&self, record: &TransactionRecord) -> Option<String>;
}

/// Keyword-table suggester. Keywords are tried longest-first so the most
/// specific label wins; a record whose `detail` field is already filled in
/// is taken as a user override and returned as-is.
pub struct KeywordSuggester {
    keywords: Vec<String>,
}

impl KeywordSuggester {
    pub fn new(keywords: Vec<String>) -> Self {
        let mut keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        keywords.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        keywords.dedup();
        Self { keywords }
    }

    /// Loads the keyword file: a flat JSON array of strings. Missing or
    /// malformed files yield a suggester that never fires.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "keywords file {} not readable ({e}), suggestions disabled",
                    path.display()
                );
                return Self::new(Vec::new());
            }
        };
        let keywords = match serde_json::from_str::<Vec<String>>(&text) {
            Ok(keywords) => keywords,
            Err(e) => {
                tracing::warn!("keywords file is not a JSON string array ({e}), suggestions disabled");
                Vec::new()
            }
        };
        Self::new(keywords)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl SuggestionProvider for KeywordSuggester {
    fn suggest(&self, record: &TransactionRecord) -> Option<String> {
        let detail = record.detail.trim();
        if !detail.is_empty() {
            return Some(detail.to_string());
        }
        if self.keywords.is_empty() {
            return None;
        }

        let fields = [
            record.merchant.trim(),
            record.sub_category.trim(),
            record.main_category.trim(),
            record.memo.trim(),
            record.account.trim(),
        ];

        // Whole-field match first.
        for field in fields.iter().filter(|f| !f.is_empty()) {
            if self.keywords.iter().any(|k| k == field) {
                return Some(field.to_string());
            }
        }

        // Then substring over the joined text; keyword order prefers longer.
        let haystack = fields
            .iter()
            .filter(|f| !f.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        self.keywords
            .iter()
            .find(|k| haystack.contains(k.as_str()))
            .cloned()
    }
}
