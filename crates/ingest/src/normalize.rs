use std::path::Path;

use thiserror::Error;

use kakeibo_core::{Field, TransactionRecord};

/// Column names of the bank export, in canonical order. The staging CSV and
/// the ledger sheet share this header row.
pub const H_DATE: &str = "날짜";
pub const H_TIME: &str = "시간";
pub const H_TYPE: &str = "타입";
pub const H_MAIN_CATEGORY: &str = "대분류";
pub const H_SUB_CATEGORY: &str = "소분류";
pub const H_MERCHANT: &str = "내용";
pub const H_AMOUNT: &str = "금액";
pub const H_CURRENCY: &str = "화폐";
pub const H_ACCOUNT: &str = "결제수단";
pub const H_MEMO: &str = "메모";
pub const H_DETAIL: &str = "상세";
pub const H_SOURCE_FILE: &str = "원본파일";
pub const H_SOURCE_ROW: &str = "원본행ID";

pub const EXPORT_HEADERS: [&str; 13] = [
    H_DATE,
    H_TIME,
    H_TYPE,
    H_MAIN_CATEGORY,
    H_SUB_CATEGORY,
    H_MERCHANT,
    H_AMOUNT,
    H_CURRENCY,
    H_ACCOUNT,
    H_MEMO,
    H_DETAIL,
    H_SOURCE_FILE,
    H_SOURCE_ROW,
];

fn field_for_header(header: &str) -> Option<Field> {
    match header {
        H_DATE => Some(Field::Date),
        H_TIME => Some(Field::Time),
        H_TYPE => Some(Field::TxType),
        H_MAIN_CATEGORY => Some(Field::MainCategory),
        H_SUB_CATEGORY => Some(Field::SubCategory),
        H_MERCHANT => Some(Field::Merchant),
        H_AMOUNT => Some(Field::Amount),
        H_CURRENCY => Some(Field::Currency),
        H_ACCOUNT => Some(Field::Account),
        H_MEMO => Some(Field::Memo),
        H_DETAIL => Some(Field::Detail),
        H_SOURCE_FILE => Some(Field::SourceFile),
        H_SOURCE_ROW => Some(Field::SourceRow),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads an export/staging/ledger CSV into canonical records.
///
/// Columns are matched by header name, not position, so column reordering in
/// the export is harmless; unknown columns are ignored. Rows without a date
/// are skipped (the export pads trailing blanks). Provenance columns are
/// kept when present and stamped from the file otherwise.
pub fn read_export_csv(path: &Path) -> Result<Vec<TransactionRecord>, NormalizeError> {
    let file = std::fs::File::open(path)?;
    let source_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers()?.clone();
    let mapping: Vec<Option<Field>> = headers.iter().map(|h| field_for_header(h.trim())).collect();

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result?;
        let mut record = TransactionRecord::default();
        for (col, field) in mapping.iter().enumerate() {
            if let Some(field) = field {
                record.set(*field, row.get(col).unwrap_or("").trim());
            }
        }
        if record.date.is_empty() {
            continue;
        }
        if record.source_file.is_empty() {
            record.source_file = source_name.clone();
        }
        if record.source_row.is_empty() {
            // 1-based data row number, matching the sheet the export came from.
            record.source_row = (idx + 2).to_string();
        }
        records.push(record);
    }
    Ok(records)
}

/// Writes records back out under the canonical header row.
pub fn write_export_csv(path: &Path, records: &[TransactionRecord]) -> Result<(), NormalizeError> {
    let file = std::fs::File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        writer.write_record([
            record.date.as_str(),
            record.time.as_str(),
            record.tx_type.as_str(),
            record.main_category.as_str(),
            record.sub_category.as_str(),
            record.merchant.as_str(),
            record.amount.as_str(),
            record.currency.as_str(),
            record.account.as_str(),
            record.memo.as_str(),
            record.detail.as_str(),
            record.source_file.as_str(),
            record.source_row.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
