pub mod categories;
pub mod categorize;
pub mod dedup;
pub mod normalize;
pub mod rules;
pub mod suggest;

pub use categories::load_categories;
pub use categorize::{Categorizer, Classification, RowCategory, Source, SUGGESTION_CONFIDENCE};
pub use dedup::{filter_new_rows, LedgerSnapshot};
pub use normalize::{read_export_csv, write_export_csv, NormalizeError};
pub use rules::{filter_rules, load_rules, MatchKind, Rule, RuleEngine, TargetField};
pub use suggest::{KeywordSuggester, SuggestionProvider};
