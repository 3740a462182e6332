use std::fmt::Write as _;

use crate::config::BudgetConfig;

/// One row of the projected budget sheet, values only. Rendering (cell
/// formats, formulas, colors) is the sheet collaborator's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportRow {
    Item {
        tier: String,
        project: String,
        key: String,
        monthly: i64,
        annual: i64,
        note: String,
    },
    Subtotal {
        tier: String,
        monthly: i64,
        annual: i64,
    },
    Total {
        monthly: i64,
        annual: i64,
    },
}

/// Projects the config into report rows: items in config order, a subtotal
/// after each tier's block, and a grand total last. Item annual figures
/// include the bonus-funded top-up, which is also called out in the note.
pub fn project_report(config: &BudgetConfig) -> Vec<ReportRow> {
    let mut rows = Vec::new();
    for tier in &config.tiers {
        let mut tier_has_items = false;
        for project in &tier.projects {
            for item in &project.items {
                tier_has_items = true;
                let annual = item.monthly * 12 + item.annual_from_bonus;
                let mut note_parts = Vec::new();
                if !item.note.is_empty() {
                    note_parts.push(item.note.clone());
                }
                if item.annual_from_bonus != 0 {
                    note_parts.push(format!("상여금 {}", item.annual_from_bonus));
                }
                rows.push(ReportRow::Item {
                    tier: tier.name.clone(),
                    project: project.name.clone(),
                    key: item.key.clone(),
                    monthly: item.monthly,
                    annual,
                    note: note_parts.join(" / "),
                });
            }
        }
        if tier_has_items {
            rows.push(ReportRow::Subtotal {
                tier: tier.name.clone(),
                monthly: config.tier_monthly(&tier.id),
                annual: config.tier_annual(&tier.id),
            });
        }
    }
    rows.push(ReportRow::Total {
        monthly: config.total_monthly(),
        annual: config.total_annual(),
    });
    rows
}

/// Plain-text budget overview for the CLI `budget status` command.
pub fn status_summary(config: &BudgetConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} 예산 ===", config.period);
    let _ = writeln!(
        out,
        "수입: 월 {} + 상여 {} = 연 {}",
        config.income.monthly_base,
        config.income.annual_bonus,
        config.annual_income()
    );
    let _ = writeln!(out);

    for tier in &config.tiers {
        let monthly = config.tier_monthly(&tier.id);
        let item_count: usize = tier.projects.iter().map(|p| p.items.len()).sum();
        let _ = writeln!(out, "[{}층] {}", tier.priority, tier.name);
        if !tier.philosophy.is_empty() {
            let _ = writeln!(out, "  철학: {}", tier.philosophy);
        }
        let _ = writeln!(
            out,
            "  월 {monthly} (프로젝트 {}개, 항목 {item_count}개)",
            tier.projects.len()
        );
        for project in &tier.projects {
            let project_monthly = config.project_monthly(project);
            if project.goal.is_empty() {
                let _ = writeln!(out, "    {}: 월 {project_monthly}", project.name);
            } else {
                let _ = writeln!(
                    out,
                    "    {}: 월 {project_monthly} — {}",
                    project.name, project.goal
                );
            }
        }
        let _ = writeln!(out);
    }

    let total_annual = config.total_annual();
    let remaining = config.annual_income() - total_annual;
    let _ = writeln!(
        out,
        "총계: 월 {} / 연 {total_annual}",
        config.total_monthly()
    );
    let _ = writeln!(
        out,
        "잔여: 연 {remaining} ({})",
        if remaining >= 0 { "흑자" } else { "적자" }
    );
    out
}
