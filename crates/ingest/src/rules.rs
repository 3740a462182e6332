use std::collections::BTreeSet;
use std::path::Path;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use kakeibo_core::{parse_amount, TransactionRecord};

/// Closed set of matching strategies. A rule file entry with an unknown
/// `match_type` fails to deserialize and is dropped at load time, rather
/// than silently never matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    #[default]
    Contains,
    Regex,
    AmountRange,
}

/// The record fields a contains/regex rule may be scoped to. `RawText` is
/// synthesized at classification time, not stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetField {
    Merchant,
    Memo,
    Account,
    RawText,
    SubCategory,
    MainCategory,
}

const DEFAULT_TARGETS: [TargetField; 6] = [
    TargetField::Merchant,
    TargetField::Memo,
    TargetField::Account,
    TargetField::RawText,
    TargetField::SubCategory,
    TargetField::MainCategory,
];

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    #[serde(default = "default_priority")]
    pub priority: i64,
    #[serde(default)]
    pub match_type: MatchKind,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Fields to test; `None` means the default six-field set.
    #[serde(default)]
    pub fields: Option<Vec<TargetField>>,
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
}

fn default_priority() -> i64 {
    1000
}

fn default_enabled() -> bool {
    true
}

/// Loads the rule file. A missing or malformed file yields an empty list;
/// the pipeline keeps running with reduced classification capability.
pub fn load_rules(path: &Path, allowed: &BTreeSet<String>) -> Vec<Rule> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("rules file {} not readable ({e}), using no rules", path.display());
            return Vec::new();
        }
    };
    parse_rules(&text, allowed)
}

pub fn parse_rules(text: &str, allowed: &BTreeSet<String>) -> Vec<Rule> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("rules file is not valid JSON ({e}), using no rules");
            return Vec::new();
        }
    };
    let Some(entries) = value.as_array() else {
        tracing::warn!("rules file is not a JSON array, using no rules");
        return Vec::new();
    };
    let rules = entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<Rule>(entry.clone()).ok())
        .collect();
    let mut rules = filter_rules(rules, allowed);
    // Stable: equal priorities keep their file order, which is the tie-break.
    rules.sort_by_key(|r| r.priority);
    rules
}

/// Applies the category allow-list once, at load time. With a non-empty
/// allow-list only rules naming a permitted category survive; with an empty
/// one, only the empty-category rules are dropped.
pub fn filter_rules(rules: Vec<Rule>, allowed: &BTreeSet<String>) -> Vec<Rule> {
    rules
        .into_iter()
        .filter(|r| {
            !r.category.is_empty() && (allowed.is_empty() || allowed.contains(&r.category))
        })
        .collect()
}

/// The flat view of a record that rules are evaluated against.
#[derive(Debug)]
struct FieldView {
    amount: Option<Decimal>,
    merchant: String,
    memo: String,
    account: String,
    sub_category: String,
    main_category: String,
    raw_text: String,
}

impl FieldView {
    fn from_record(record: &TransactionRecord) -> Self {
        let merchant = record.merchant.trim().to_string();
        let memo = record.memo.trim().to_string();
        let account = record.account.trim().to_string();
        let sub_category = record.sub_category.trim().to_string();
        let main_category = record.main_category.trim().to_string();
        let raw_text = [&merchant, &memo, &account, &sub_category, &main_category]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        FieldView {
            amount: parse_amount(&record.amount),
            merchant,
            memo,
            account,
            sub_category,
            main_category,
            raw_text,
        }
    }

    fn get(&self, field: TargetField) -> &str {
        match field {
            TargetField::Merchant => &self.merchant,
            TargetField::Memo => &self.memo,
            TargetField::Account => &self.account,
            TargetField::RawText => &self.raw_text,
            TargetField::SubCategory => &self.sub_category,
            TargetField::MainCategory => &self.main_category,
        }
    }
}

struct CompiledRule {
    rule: Rule,
    /// `None` for non-regex rules and for invalid patterns. An invalid
    /// pattern simply never matches; it does not abort the batch.
    regex: Option<Regex>,
}

/// Ordered rule evaluator. First matching rule wins, no scoring;
/// rule authors control precedence through priority numbers alone.
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut compiled: Vec<CompiledRule> = rules
            .into_iter()
            .map(|rule| {
                let regex = match rule.match_type {
                    MatchKind::Regex => rule.pattern.as_deref().and_then(|p| match Regex::new(p) {
                        Ok(re) => Some(re),
                        Err(e) => {
                            tracing::warn!("invalid rule pattern {p:?} ignored: {e}");
                            None
                        }
                    }),
                    _ => None,
                };
                CompiledRule { rule, regex }
            })
            .collect();
        compiled.sort_by_key(|cr| cr.rule.priority);
        Self { rules: compiled }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the category of the first enabled rule matching `record`,
    /// in ascending priority order.
    pub fn match_category(&self, record: &TransactionRecord) -> Option<&str> {
        let view = FieldView::from_record(record);
        self.rules
            .iter()
            .filter(|cr| cr.rule.enabled)
            .find(|cr| rule_matches(cr, &view))
            .map(|cr| cr.rule.category.as_str())
    }
}

fn rule_matches(cr: &CompiledRule, view: &FieldView) -> bool {
    let rule = &cr.rule;
    match rule.match_type {
        MatchKind::AmountRange => {
            let Some(amount) = view.amount else {
                return false;
            };
            if rule.min_amount.is_some_and(|min| amount < min) {
                return false;
            }
            if rule.max_amount.is_some_and(|max| amount > max) {
                return false;
            }
            true
        }
        MatchKind::Contains => {
            let Some(pattern) = rule.pattern.as_deref().filter(|p| !p.is_empty()) else {
                return false;
            };
            targets(rule, view).any(|t| t.contains(pattern))
        }
        MatchKind::Regex => {
            let Some(regex) = cr.regex.as_ref() else {
                return false;
            };
            targets(rule, view).any(|t| regex.is_match(t))
        }
    }
}

/// The rule's target field values, empty ones excluded from the search set.
fn targets<'a>(rule: &'a Rule, view: &'a FieldView) -> impl Iterator<Item = &'a str> {
    rule.fields
        .as_deref()
        .unwrap_or(&DEFAULT_TARGETS)
        .iter()
        .map(|f| view.get(*f))
        .filter(|t| !t.is_empty())
}
