use sha2::{Digest, Sha256};

use crate::record::{Field, TransactionRecord};

/// The field subset that identifies a transaction for dedup purposes.
/// Two records agreeing on these five fields are the same transaction,
/// whatever their other fields say.
pub const KEY_FIELDS: [Field; 5] = [
    Field::Date,
    Field::Time,
    Field::Amount,
    Field::Merchant,
    Field::Account,
];

/// Joins field values with a separator the export data never contains,
/// so ("ab","c") and ("a","bc") cannot collide.
const SEPARATOR: &[u8] = b"|";

/// SHA-256 over the values of `fields` in order, as 64 lowercase hex chars.
/// Missing fields hash as empty strings; this never fails.
pub fn fingerprint(record: &TransactionRecord, fields: &[Field]) -> String {
    let mut hasher = Sha256::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            hasher.update(SEPARATOR);
        }
        hasher.update(record.get(*field).as_bytes());
    }
    to_hex(hasher.finalize().into())
}

/// Fingerprint over the standard [`KEY_FIELDS`] subset.
pub fn row_key(record: &TransactionRecord) -> String {
    fingerprint(record, &KEY_FIELDS)
}

fn to_hex(hash: [u8; 32]) -> String {
    hash.iter().map(|b| format!("{b:02x}")).collect()
}
