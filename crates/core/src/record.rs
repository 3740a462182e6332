use serde::{Deserialize, Serialize};

/// One normalized ledger row. Produced by the normalization step and treated
/// as immutable from then on; a record has no identity beyond its field values.
///
/// Every field is a string — the export hands us text, and the dedup
/// fingerprint must hash exactly what the ledger stores, not a reparse of it.
/// An empty string means the field was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: String,
    pub time: String,
    pub tx_type: String,
    pub main_category: String,
    pub sub_category: String,
    pub merchant: String,
    pub amount: String,
    pub currency: String,
    pub account: String,
    pub memo: String,
    pub detail: String,
    pub source_file: String,
    pub source_row: String,
}

/// Names every addressable field of a [`TransactionRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Time,
    TxType,
    MainCategory,
    SubCategory,
    Merchant,
    Amount,
    Currency,
    Account,
    Memo,
    Detail,
    SourceFile,
    SourceRow,
}

impl TransactionRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::TxType => &self.tx_type,
            Field::MainCategory => &self.main_category,
            Field::SubCategory => &self.sub_category,
            Field::Merchant => &self.merchant,
            Field::Amount => &self.amount,
            Field::Currency => &self.currency,
            Field::Account => &self.account,
            Field::Memo => &self.memo,
            Field::Detail => &self.detail,
            Field::SourceFile => &self.source_file,
            Field::SourceRow => &self.source_row,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Date => self.date = value,
            Field::Time => self.time = value,
            Field::TxType => self.tx_type = value,
            Field::MainCategory => self.main_category = value,
            Field::SubCategory => self.sub_category = value,
            Field::Merchant => self.merchant = value,
            Field::Amount => self.amount = value,
            Field::Currency => self.currency = value,
            Field::Account => self.account = value,
            Field::Memo => self.memo = value,
            Field::Detail => self.detail = value,
            Field::SourceFile => self.source_file = value,
            Field::SourceRow => self.source_row = value,
        }
    }
}
