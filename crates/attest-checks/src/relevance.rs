//! Claimed-category relevance from column names.

use attest_contracts::{check::Relevance, settings::CategoryVocabulary, table::Table};

/// Confirm `claimed` if any column name contains one of its keywords
/// (case-insensitive). Otherwise, or when `claimed` has no vocabulary, the
/// result is `Relevance::Unknown`.
pub fn classify(table: &Table, claimed: &str, vocabulary: &CategoryVocabulary) -> Relevance {
    let Some(keywords) = vocabulary.keywords(claimed) else {
        return Relevance::Unknown;
    };
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let matched = table.column_names().any(|name| {
        let name = name.to_lowercase();
        keywords.iter().any(|k| name.contains(k.as_str()))
    });

    if matched {
        Relevance::Confirmed(claimed.to_string())
    } else {
        Relevance::Unknown
    }
}

#[cfg(test)]
mod tests {
    use attest_contracts::{
        check::Relevance,
        settings::CategoryVocabulary,
        table::{CellValue, Table},
    };

    use super::classify;

    fn table_with(columns: &[&str]) -> Table {
        Table::from_rows(columns, vec![vec![CellValue::Int(1); columns.len()]]).unwrap()
    }

    #[test]
    fn test_keyword_substring_is_case_insensitive() {
        let table = table_with(&["StockPrice"]);
        let relevance = classify(&table, "Finance", &CategoryVocabulary::default());
        assert_eq!(relevance, Relevance::Confirmed("Finance".to_string()));
        assert!(relevance.matches_claim("Finance"));
    }

    #[test]
    fn test_no_keyword_is_unknown() {
        let table = table_with(&["a", "b"]);
        let relevance = classify(&table, "Finance", &CategoryVocabulary::default());
        assert_eq!(relevance, Relevance::Unknown);
        assert_eq!(relevance.label(), "Unknown");
    }

    #[test]
    fn test_never_infers_another_category() {
        // Health keywords present, but the claim is Finance.
        let table = table_with(&["patient_id", "diagnosis"]);
        assert_eq!(classify(&table, "Finance", &CategoryVocabulary::default()), Relevance::Unknown);
        assert_eq!(
            classify(&table, "Health", &CategoryVocabulary::default()),
            Relevance::Confirmed("Health".to_string())
        );
    }

    #[test]
    fn test_unconfigured_category_is_unknown() {
        let table = table_with(&["price"]);
        assert_eq!(classify(&table, "Retail", &CategoryVocabulary::default()), Relevance::Unknown);
    }
}
