//! Demographic balance of a single designated column.

use std::collections::HashMap;

use attest_contracts::{
    check::BiasVerdict,
    settings::CheckSettings,
    table::{CellValue, Table},
};

/// A hashable view of a non-missing cell. Values of different types never
/// share a key, so `1`, `1.0` and `"1"` are three groups.
#[derive(Debug, PartialEq, Eq, Hash)]
enum GroupKey<'a> {
    Bool(bool),
    Int(i64),
    Float(u64),
    Text(&'a str),
}

impl<'a> GroupKey<'a> {
    fn of(cell: &'a CellValue) -> Option<Self> {
        match cell {
            CellValue::Null => None,
            CellValue::Bool(b) => Some(GroupKey::Bool(*b)),
            CellValue::Int(v) => Some(GroupKey::Int(*v)),
            // -0.0 and 0.0 are one value.
            CellValue::Float(v) => Some(GroupKey::Float(if *v == 0.0 { 0 } else { v.to_bits() })),
            CellValue::Text(s) => Some(GroupKey::Text(s)),
        }
    }
}

/// `Imbalanced` when one distinct non-missing value of the demographic column
/// makes up strictly more than `imbalance_threshold` of its non-missing cells.
///
/// An absent column, or one with no non-missing cells, is `Balanced`.
pub fn detect_bias(table: &Table, settings: &CheckSettings) -> BiasVerdict {
    let Some(column) = table.column(&settings.demographic_column) else {
        return BiasVerdict::Balanced;
    };

    let mut counts: HashMap<GroupKey<'_>, u64> = HashMap::new();
    let mut total = 0u64;
    for key in column.cells.iter().filter(|c| !c.is_missing()).filter_map(GroupKey::of) {
        *counts.entry(key).or_default() += 1;
        total += 1;
    }
    if total == 0 {
        return BiasVerdict::Balanced;
    }

    let largest = counts.values().copied().max().unwrap_or(0);
    if largest as f64 / total as f64 > settings.imbalance_threshold {
        BiasVerdict::Imbalanced
    } else {
        BiasVerdict::Balanced
    }
}
