use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("budget config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One budget line. `key` doubles as the correlation key against the ledger
/// sheet, which is why uniqueness matters (see validate).
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetItem {
    pub key: String,
    #[serde(default)]
    pub monthly: i64,
    #[serde(default)]
    pub note: String,
    #[serde(default, rename = "type")]
    pub item_type: ItemType,
    /// Annual top-up funded from the bonus rather than monthly salary.
    #[serde(default)]
    pub annual_from_bonus: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Regular,
    Irregular,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub goal: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub items: Vec<BudgetItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tier {
    pub id: String,
    pub name: String,
    #[serde(default = "default_tier_priority")]
    pub priority: i64,
    #[serde(default)]
    pub philosophy: String,
    #[serde(default)]
    pub color: TierColor,
    #[serde(default)]
    pub projects: Vec<Project>,
}

fn default_tier_priority() -> i64 {
    99
}

#[derive(Debug, Clone, Deserialize)]
pub struct TierColor {
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_header")]
    pub header: String,
}

impl Default for TierColor {
    fn default() -> Self {
        TierColor {
            bg: default_bg(),
            header: default_header(),
        }
    }
}

fn default_bg() -> String {
    "#FFFFFF".to_string()
}

fn default_header() -> String {
    "#333333".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Income {
    #[serde(default)]
    pub monthly_base: i64,
    #[serde(default)]
    pub annual_bonus: i64,
    #[serde(default)]
    pub description: String,
}

/// The declarative budget: tiers → projects → items. Loaded fresh from the
/// config file on every invocation; the core never persists it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetConfig {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub period_start: String,
    #[serde(default)]
    pub period_end: String,
    #[serde(default)]
    pub income: Income,
    #[serde(default)]
    pub tiers: Vec<Tier>,
    #[serde(default)]
    pub bonus_allocation: BTreeMap<String, i64>,
}

impl BudgetConfig {
    pub fn load(path: &Path) -> Result<Self, BudgetError> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn annual_income(&self) -> i64 {
        self.income.monthly_base * 12 + self.income.annual_bonus
    }

    /// Every item with its tier and project, in config order.
    pub fn all_items(&self) -> impl Iterator<Item = (&Tier, &Project, &BudgetItem)> {
        self.tiers.iter().flat_map(|tier| {
            tier.projects.iter().flat_map(move |project| {
                project.items.iter().map(move |item| (tier, project, item))
            })
        })
    }

    pub fn total_monthly(&self) -> i64 {
        self.all_items().map(|(_, _, item)| item.monthly).sum()
    }

    /// Annual spend: twelve months of every item plus its bonus-funded top-up.
    pub fn total_annual(&self) -> i64 {
        self.all_items()
            .map(|(_, _, item)| item.monthly * 12 + item.annual_from_bonus)
            .sum()
    }

    /// Monthly subtotal for one tier; 0 for an unknown id.
    pub fn tier_monthly(&self, tier_id: &str) -> i64 {
        self.all_items()
            .filter(|(tier, _, _)| tier.id == tier_id)
            .map(|(_, _, item)| item.monthly)
            .sum()
    }

    pub fn tier_annual(&self, tier_id: &str) -> i64 {
        self.all_items()
            .filter(|(tier, _, _)| tier.id == tier_id)
            .map(|(_, _, item)| item.monthly * 12 + item.annual_from_bonus)
            .sum()
    }

    pub fn project_monthly(&self, project: &Project) -> i64 {
        project.items.iter().map(|item| item.monthly).sum()
    }
}
