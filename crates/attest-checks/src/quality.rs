//! Missing-value and freeform-type counts.

use attest_contracts::{
    check::QualityReport,
    settings::CheckSettings,
    table::{ColumnType, Table},
};

/// Count missing cells and freeform-text columns.
///
/// A column counts as an incorrect type when its type is `Text` and its name
/// is not listed in `settings.categorical_columns`. Fully-missing columns are
/// typed `Null` and never count.
pub fn check_quality(table: &Table, settings: &CheckSettings) -> QualityReport {
    let missing_values = table.cells().filter(|(_, _, cell)| cell.is_missing()).count() as u64;

    let incorrect_types = table
        .columns()
        .iter()
        .filter(|c| c.column_type == ColumnType::Text)
        .filter(|c| !settings.categorical_columns.iter().any(|exempt| exempt == &c.name))
        .count() as u64;

    QualityReport { missing_values, incorrect_types }
}
