use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use kakeibo_core::TransactionRecord;

use crate::rules::RuleEngine;
use crate::suggest::SuggestionProvider;

/// Confidence recorded for suggestion-sourced categories. Rule hits are 1.0.
pub const SUGGESTION_CONFIDENCE: f64 = 0.6;

/// Where a category came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Source {
    #[serde(rename = "rule")]
    Rule,
    #[serde(rename = "llm-suggestion")]
    Suggestion,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Rule => write!(f, "rule"),
            Source::Suggestion => write!(f, "llm-suggestion"),
        }
    }
}

/// Outcome of classifying one record. Either both fields are set or neither.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub category: Option<String>,
    pub source: Option<Source>,
}

/// The per-row tuple handed to the ledger-writing collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct RowCategory {
    pub category: Option<String>,
    pub source: Option<Source>,
    /// Always starts false; a human flips it in the sheet.
    pub reviewed: bool,
    pub confidence: Option<f64>,
}

/// Combines the rule engine with the optional suggestion fallback and the
/// category allow-list. Rules win; the suggestion is consulted only when no
/// rule matched, and its label must also pass the allow-list.
pub struct Categorizer {
    engine: RuleEngine,
    provider: Option<Box<dyn SuggestionProvider>>,
    allowed: BTreeSet<String>,
}

impl Categorizer {
    pub fn new(engine: RuleEngine, allowed: BTreeSet<String>) -> Self {
        Self {
            engine,
            provider: None,
            allowed,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn SuggestionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn classify(&self, record: &TransactionRecord) -> Classification {
        if let Some(category) = self.engine.match_category(record) {
            return Classification {
                category: Some(category.to_string()),
                source: Some(Source::Rule),
            };
        }
        if let Some(provider) = &self.provider {
            if let Some(suggestion) = provider.suggest(record) {
                if self.allowed.is_empty() || self.allowed.contains(&suggestion) {
                    return Classification {
                        category: Some(suggestion),
                        source: Some(Source::Suggestion),
                    };
                }
            }
        }
        Classification::default()
    }

    /// Batch classification, one output per input row, in order.
    pub fn categorize_rows(&self, rows: &[TransactionRecord]) -> Vec<RowCategory> {
        rows.iter()
            .map(|row| {
                let Classification { category, source } = self.classify(row);
                let confidence = source.map(|s| match s {
                    Source::Rule => 1.0,
                    Source::Suggestion => SUGGESTION_CONFIDENCE,
                });
                RowCategory {
                    category,
                    source,
                    reviewed: false,
                    confidence,
                }
            })
            .collect()
    }
}
