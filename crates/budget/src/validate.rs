use std::collections::HashMap;
use std::fmt;

use crate::config::BudgetConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Blocks deployment of the config.
    Error,
    /// Surfaced but never blocks.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARN"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Finding {
    pub severity: Severity,
    /// `tier/project` or `tier/project/key`, enough to locate the line in
    /// the config file.
    pub location: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} — {}", self.severity, self.location, self.message)
    }
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub ok: bool,
    pub findings: Vec<Finding>,
}

/// Checks the whole config and reports every finding, with no truncation at
/// the first error, so one validate run gives a complete fix list.
///
/// Hard failures: empty tier/project id, empty item key, negative monthly.
/// Warnings: duplicate item key (the key is the sole ledger correlation key,
/// so duplicates make aggregation ambiguous) and annual budget exceeding
/// annual income.
pub fn validate(config: &BudgetConfig) -> ValidationReport {
    let mut findings = Vec::new();
    // item key → first-seen location
    let mut keys_seen: HashMap<&str, String> = HashMap::new();

    for tier in &config.tiers {
        if tier.id.is_empty() {
            findings.push(Finding {
                severity: Severity::Error,
                location: tier.name.clone(),
                message: "tier id is empty".to_string(),
            });
        }
        for project in &tier.projects {
            let location = format!("{}/{}", tier.name, project.name);
            if project.id.is_empty() {
                findings.push(Finding {
                    severity: Severity::Error,
                    location: location.clone(),
                    message: "project id is empty".to_string(),
                });
            }
            for item in &project.items {
                if item.key.is_empty() {
                    findings.push(Finding {
                        severity: Severity::Error,
                        location: location.clone(),
                        message: "item key is empty".to_string(),
                    });
                }
                if let Some(first_seen) = keys_seen.get(item.key.as_str()) {
                    findings.push(Finding {
                        severity: Severity::Warning,
                        location: format!("{}/{}", location, item.key),
                        message: format!(
                            "duplicate item key '{}' (first seen at {first_seen}); \
                             ledger aggregation by this key will be ambiguous",
                            item.key
                        ),
                    });
                } else {
                    keys_seen.insert(item.key.as_str(), location.clone());
                }
                if item.monthly < 0 {
                    findings.push(Finding {
                        severity: Severity::Error,
                        location: format!("{}/{}", location, item.key),
                        message: format!("monthly amount is negative: {}", item.monthly),
                    });
                }
            }
        }
    }

    let total = config.total_annual();
    let income = config.annual_income();
    if income > 0 && total > income {
        findings.push(Finding {
            severity: Severity::Warning,
            location: "totals".to_string(),
            message: format!(
                "annual budget {total} exceeds annual income {income} by {}",
                total - income
            ),
        });
    }

    let ok = findings.iter().all(|f| f.severity != Severity::Error);
    ValidationReport { ok, findings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BudgetItem, Income, ItemType, Project, Tier, TierColor};

    fn item(key: &str, monthly: i64) -> BudgetItem {
        BudgetItem {
            key: key.to_string(),
            monthly,
            note: String::new(),
            item_type: ItemType::Regular,
            annual_from_bonus: 0,
        }
    }

    fn tier(id: &str, name: &str, projects: Vec<Project>) -> Tier {
        Tier {
            id: id.to_string(),
            name: name.to_string(),
            priority: 1,
            philosophy: String::new(),
            color: TierColor::default(),
            projects,
        }
    }

    fn project(id: &str, name: &str, items: Vec<BudgetItem>) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            goal: String::new(),
            note: String::new(),
            items,
        }
    }

    fn config(tiers: Vec<Tier>) -> BudgetConfig {
        BudgetConfig {
            income: Income {
                monthly_base: 1_000_000,
                annual_bonus: 0,
                description: String::new(),
            },
            tiers,
            ..BudgetConfig::default()
        }
    }

    #[test]
    fn clean_config_passes() {
        let cfg = config(vec![tier(
            "t1",
            "생존",
            vec![project("p1", "주거", vec![item("월세", 100)])],
        )]);
        let report = validate(&cfg);
        assert!(report.ok);
        assert!(report.findings.is_empty());
    }

    #[test]
    fn negative_monthly_is_a_hard_failure_with_location() {
        let cfg = config(vec![tier(
            "t1",
            "생존",
            vec![project("p1", "주거", vec![item("월세", -50)])],
        )]);
        let report = validate(&cfg);
        assert!(!report.ok);
        let finding = &report.findings[0];
        assert_eq!(finding.severity, Severity::Error);
        assert_eq!(finding.location, "생존/주거/월세");
    }

    #[test]
    fn empty_ids_are_hard_failures() {
        let cfg = config(vec![tier(
            "",
            "이름없는층",
            vec![project("", "프로젝트", vec![item("", 10)])],
        )]);
        let report = validate(&cfg);
        assert!(!report.ok);
        assert_eq!(
            report
                .findings
                .iter()
                .filter(|f| f.severity == Severity::Error)
                .count(),
            3
        );
    }

    #[test]
    fn duplicate_key_is_a_warning_not_a_failure() {
        let cfg = config(vec![tier(
            "t1",
            "생존",
            vec![
                project("p1", "주거", vec![item("공과금", 100)]),
                project("p2", "생활", vec![item("공과금", 200)]),
            ],
        )]);
        let report = validate(&cfg);
        assert!(report.ok);
        assert_eq!(report.findings.len(), 1);
        let finding = &report.findings[0];
        assert_eq!(finding.severity, Severity::Warning);
        assert!(finding.message.contains("생존/주거"));
    }

    #[test]
    fn overspend_is_a_warning() {
        // income 12,000,000/yr vs budget 24,000,000/yr
        let cfg = config(vec![tier(
            "t1",
            "생존",
            vec![project("p1", "주거", vec![item("월세", 2_000_000)])],
        )]);
        let report = validate(&cfg);
        assert!(report.ok);
        assert!(report
            .findings
            .iter()
            .any(|f| f.severity == Severity::Warning && f.location == "totals"));
    }

    #[test]
    fn all_findings_are_collected_not_just_the_first() {
        let cfg = config(vec![tier(
            "t1",
            "생존",
            vec![project(
                "p1",
                "주거",
                vec![item("월세", -1), item("관리비", -2)],
            )],
        )]);
        let report = validate(&cfg);
        assert!(!report.ok);
        assert_eq!(report.findings.len(), 2);
    }
}
