pub mod config;
pub mod report;
pub mod validate;

pub use config::{BudgetConfig, BudgetError, BudgetItem, ItemType, Project, Tier};
pub use report::{project_report, status_summary, ReportRow};
pub use validate::{validate, Finding, Severity, ValidationReport};
