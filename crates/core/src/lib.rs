pub mod amount;
pub mod fingerprint;
pub mod record;

pub use amount::parse_amount;
pub use fingerprint::{fingerprint, row_key, KEY_FIELDS};
pub use record::{Field, TransactionRecord};
