//! Content hashing: dataset identity and the verification seal.
//!
//! Dataset hash input layout (all integers little-endian u64):
//!   1. column count
//!   2. each column name, length-prefixed UTF-8, in column order
//!   3. row count
//!   4. each cell in row-major order: one tag byte, then the payload
//!
//! Cell payloads: Null none; Bool one byte; Int i64; Float canonical f64
//! bits (one NaN pattern, -0.0 folded into 0.0); Text length-prefixed UTF-8.
//! Nothing about the source file (path, mtime, encoding) is hashed.

use sha2::{Digest as _, Sha256};

use attest_contracts::{
    check::QualityReport,
    identity::Digest,
    table::{CellValue, Table},
};

const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_TEXT: u8 = 4;

fn update_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_le_bytes());
}

fn update_str(hasher: &mut Sha256, s: &str) {
    update_len(hasher, s.len());
    hasher.update(s.as_bytes());
}

fn canonical_float_bits(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

fn update_cell(hasher: &mut Sha256, cell: &CellValue) {
    match cell {
        CellValue::Null => hasher.update([TAG_NULL]),
        CellValue::Bool(b) => {
            hasher.update([TAG_BOOL]);
            hasher.update([u8::from(*b)]);
        }
        CellValue::Int(v) => {
            hasher.update([TAG_INT]);
            hasher.update(v.to_le_bytes());
        }
        CellValue::Float(v) => {
            hasher.update([TAG_FLOAT]);
            hasher.update(canonical_float_bits(*v).to_le_bytes());
        }
        CellValue::Text(s) => {
            hasher.update([TAG_TEXT]);
            update_str(hasher, s);
        }
    }
}

/// Compute the dataset identity of `table`.
///
/// Identical content in identical row and column order always produces the
/// same digest, in any process.
pub fn dataset_hash(table: &Table) -> Digest {
    let mut hasher = Sha256::new();

    update_len(&mut hasher, table.column_count());
    for name in table.column_names() {
        update_str(&mut hasher, name);
    }

    update_len(&mut hasher, table.row_count());
    let columns = table.columns();
    for row in 0..table.row_count() {
        for column in columns {
            update_cell(&mut hasher, &column.cells[row]);
        }
    }

    Digest::from_bytes(hasher.finalize().into())
}

/// The exact bytes sealed by the verification hash.
///
/// The layout (key order, `": "` and `", "` separators) is fixed so digests
/// agree with reports produced by earlier tooling.
pub fn verification_payload(quality: &QualityReport, pii_detected: bool) -> String {
    format!(
        "{{\"quality\": {{\"missingValues\": {}, \"incorrectTypes\": {}}}, \"pii\": {}}}",
        quality.missing_values, quality.incorrect_types, pii_detected
    )
}

/// Seal the quality and PII fields of a report.
///
/// Relevance, authenticity, and bias are deliberately not covered.
pub fn verification_hash(quality: &QualityReport, pii_detected: bool) -> Digest {
    let payload = verification_payload(quality, pii_detected);
    Digest::from_bytes(Sha256::digest(payload.as_bytes()).into())
}
