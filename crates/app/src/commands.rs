use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::info;

use kakeibo_budget::{project_report, status_summary, validate, BudgetConfig, ReportRow};
use kakeibo_core::TransactionRecord;
use kakeibo_ingest::{
    filter_new_rows, load_categories, load_rules, read_export_csv, write_export_csv, Categorizer,
    KeywordSuggester, LedgerSnapshot, RowCategory, RuleEngine,
};

use crate::args::RunArgs;

/// Full ingest pass: dedup the batch against the ledger, categorize what
/// survived, prepend it newest-first, and write the per-row categorization
/// sidecar. A second run over the same input is a no-op.
pub fn run(args: RunArgs) -> Result<ExitCode> {
    let ledger_rows = if args.ledger.exists() {
        read_export_csv(&args.ledger)
            .with_context(|| format!("reading ledger {}", args.ledger.display()))?
    } else {
        Vec::new()
    };
    let mut snapshot = LedgerSnapshot::from_records(&ledger_rows);
    info!(
        rows = ledger_rows.len(),
        max_date = snapshot.max_date.as_deref().unwrap_or("-"),
        "ledger snapshot"
    );

    let batch = read_export_csv(&args.input)
        .with_context(|| format!("reading input {}", args.input.display()))?;
    let batch_len = batch.len();
    let mut fresh = filter_new_rows(batch, &mut snapshot);
    info!(read = batch_len, new = fresh.len(), "dedup done");
    if fresh.is_empty() {
        println!("새 거래 없음");
        return Ok(ExitCode::SUCCESS);
    }

    // Ledger convention: newest row on top.
    fresh.sort_by(|a, b| row_timestamp(b).cmp(&row_timestamp(a)));

    let allowed = load_categories(&args.categories);
    let rules = load_rules(&args.rules, &allowed);
    let categorizer = Categorizer::new(RuleEngine::new(rules), allowed)
        .with_provider(Box::new(KeywordSuggester::load(&args.keywords)));
    let categories = categorizer.categorize_rows(&fresh);

    let categories_out = args
        .categories_out
        .unwrap_or_else(|| args.ledger.with_extension("categories.csv"));
    write_categories_csv(&categories_out, &fresh, &categories)
        .with_context(|| format!("writing {}", categories_out.display()))?;

    let added = fresh.len();
    let mut combined = fresh;
    combined.extend(ledger_rows);
    write_export_csv(&args.ledger, &combined)
        .with_context(|| format!("writing ledger {}", args.ledger.display()))?;

    println!("새 거래 {added}건 추가 (원장 {}건)", combined.len());
    Ok(ExitCode::SUCCESS)
}

/// Sort key for ledger ordering. Unparseable timestamps sink to the bottom
/// rather than failing the run.
fn row_timestamp(record: &TransactionRecord) -> NaiveDateTime {
    let time = if record.time.is_empty() {
        "00:00:00"
    } else {
        record.time.as_str()
    };
    NaiveDateTime::parse_from_str(&format!("{} {}", record.date, time), "%Y-%m-%d %H:%M:%S")
        .unwrap_or(NaiveDateTime::MIN)
}

fn write_categories_csv(
    path: &Path,
    rows: &[TransactionRecord],
    categories: &[RowCategory],
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["날짜", "시간", "내용", "금액", "자동카테고리", "출처", "검토", "신뢰도"])?;
    for (row, cat) in rows.iter().zip(categories) {
        let source = cat.source.map(|s| s.to_string()).unwrap_or_default();
        let confidence = cat.confidence.map(|c| format!("{c:.2}")).unwrap_or_default();
        writer.write_record([
            row.date.as_str(),
            row.time.as_str(),
            row.merchant.as_str(),
            row.amount.as_str(),
            cat.category.as_deref().unwrap_or(""),
            source.as_str(),
            if cat.reviewed { "true" } else { "false" },
            confidence.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Prints every finding, then a pass/fail verdict. Warnings alone still pass;
/// the exit code is non-zero only on hard failures.
pub fn budget_validate(path: &Path) -> Result<ExitCode> {
    let config = BudgetConfig::load(path)
        .with_context(|| format!("loading budget config {}", path.display()))?;
    let report = validate(&config);
    for finding in &report.findings {
        println!("{finding}");
    }
    println!(
        "연 수입 {} / 연 예산 {}",
        config.annual_income(),
        config.total_annual()
    );
    if report.ok {
        println!("검증 통과");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("검증 실패");
        Ok(ExitCode::FAILURE)
    }
}

pub fn budget_status(path: &Path) -> Result<ExitCode> {
    let config = BudgetConfig::load(path)
        .with_context(|| format!("loading budget config {}", path.display()))?;
    print!("{}", status_summary(&config));
    Ok(ExitCode::SUCCESS)
}

pub fn budget_report(path: &Path, out: Option<&Path>) -> Result<ExitCode> {
    let config = BudgetConfig::load(path)
        .with_context(|| format!("loading budget config {}", path.display()))?;
    let rows = project_report(&config);
    match out {
        Some(out) => {
            let file = std::fs::File::create(out)
                .with_context(|| format!("creating {}", out.display()))?;
            write_report_csv(csv::Writer::from_writer(file), &rows)?;
        }
        None => write_report_csv(csv::Writer::from_writer(std::io::stdout()), &rows)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn write_report_csv<W: std::io::Write>(
    mut writer: csv::Writer<W>,
    rows: &[ReportRow],
) -> Result<()> {
    writer.write_record(["구분", "프로젝트", "항목", "월 예산", "연 예산", "비고"])?;
    for row in rows {
        match row {
            ReportRow::Item {
                tier,
                project,
                key,
                monthly,
                annual,
                note,
            } => {
                let monthly = monthly.to_string();
                let annual = annual.to_string();
                writer.write_record([
                    tier.as_str(),
                    project.as_str(),
                    key.as_str(),
                    monthly.as_str(),
                    annual.as_str(),
                    note.as_str(),
                ])?;
            }
            ReportRow::Subtotal {
                tier,
                monthly,
                annual,
            } => {
                let monthly = monthly.to_string();
                let annual = annual.to_string();
                writer.write_record([
                    tier.as_str(),
                    "",
                    "소계",
                    monthly.as_str(),
                    annual.as_str(),
                    "",
                ])?;
            }
            ReportRow::Total { monthly, annual } => {
                let monthly = monthly.to_string();
                let annual = annual.to_string();
                writer.write_record(["", "", "총계", monthly.as_str(), annual.as_str(), ""])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write(path: &Path, content: &str) {
        fs::write(path, content).unwrap();
    }

    fn run_args(dir: &Path) -> RunArgs {
        RunArgs {
            input: dir.join("input.csv"),
            ledger: dir.join("ledger.csv"),
            categories_out: None,
            rules: dir.join("rules.json"),
            categories: dir.join("categories.json"),
            keywords: dir.join("keywords.json"),
        }
    }

    fn seed(dir: &Path) {
        write(
            &dir.join("ledger.csv"),
            "날짜,시간,내용,금액,결제수단\n2025-06-01,09:00:00,편의점,-2000,체크카드\n",
        );
        write(
            &dir.join("input.csv"),
            concat!(
                "날짜,시간,내용,금액,결제수단\n",
                "2025-06-01,09:00:00,편의점,-2000,체크카드\n",
                "2025-06-02,08:00:00,김밥천국,-6000,체크카드\n",
                "2025-06-02,12:30:00,스타벅스 강남점,-4500,체크카드\n",
            ),
        );
        write(
            &dir.join("rules.json"),
            r#"[{"match_type":"contains","pattern":"스타벅스","category":"카페","priority":1}]"#,
        );
        write(&dir.join("categories.json"), r#"["카페","식비"]"#);
        write(&dir.join("keywords.json"), r#"["식비"]"#);
    }

    #[test]
    fn run_dedups_sorts_and_writes_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        run(run_args(dir.path())).unwrap();

        let ledger = read_export_csv(&dir.path().join("ledger.csv")).unwrap();
        assert_eq!(ledger.len(), 3);
        // new rows first, newest on top, old ledger content after
        assert_eq!(ledger[0].merchant, "스타벅스 강남점");
        assert_eq!(ledger[1].merchant, "김밥천국");
        assert_eq!(ledger[2].merchant, "편의점");

        let sidecar =
            fs::read_to_string(dir.path().join("ledger").with_extension("categories.csv")).unwrap();
        let mut lines = sidecar.lines().skip(1);
        let starbucks = lines.next().unwrap();
        assert!(starbucks.contains("카페"));
        assert!(starbucks.contains("rule"));
        assert!(starbucks.contains("1.00"));
    }

    #[test]
    fn second_run_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        run(run_args(dir.path())).unwrap();
        let before = fs::read_to_string(dir.path().join("ledger.csv")).unwrap();
        run(run_args(dir.path())).unwrap();
        let after = fs::read_to_string(dir.path().join("ledger.csv")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn run_creates_ledger_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        seed(dir.path());
        fs::remove_file(dir.path().join("ledger.csv")).unwrap();
        run(run_args(dir.path())).unwrap();
        let ledger = read_export_csv(&dir.path().join("ledger.csv")).unwrap();
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn timestamp_fallback_sinks_bad_rows() {
        let good = TransactionRecord {
            date: "2025-06-01".to_string(),
            time: "09:00:00".to_string(),
            ..TransactionRecord::default()
        };
        let bad = TransactionRecord {
            date: "not-a-date".to_string(),
            ..TransactionRecord::default()
        };
        assert!(row_timestamp(&good) > row_timestamp(&bad));
    }

    #[test]
    fn validate_command_reports_failure_exit() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("budget.toml");
        write(
            &config,
            concat!(
                "[[tiers]]\nid = \"t1\"\nname = \"생존\"\n",
                "[[tiers.projects]]\nid = \"p1\"\nname = \"주거\"\n",
                "[[tiers.projects.items]]\nkey = \"월세\"\nmonthly = -5\n",
            ),
        );
        let code = budget_validate(&config).unwrap();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::FAILURE));
    }

    #[test]
    fn report_command_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("budget.toml");
        write(
            &config,
            concat!(
                "[[tiers]]\nid = \"t1\"\nname = \"생존\"\n",
                "[[tiers.projects]]\nid = \"p1\"\nname = \"주거\"\n",
                "[[tiers.projects.items]]\nkey = \"월세\"\nmonthly = 100\n",
            ),
        );
        let out: PathBuf = dir.path().join("report.csv");
        budget_report(&config, Some(&out)).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.contains("월세"));
        assert!(text.contains("총계"));
    }
}
