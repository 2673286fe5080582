//! # attest-contracts
//!
//! Shared types, report shapes, and errors for the dataset attestation
//! pipeline.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod check;
pub mod entity;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod report;
pub mod settings;
pub mod table;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use check::{BiasVerdict, QualityReport, Relevance};
    use entity::EntityLabel;
    use error::AttestError;
    use identity::Digest;
    use ledger::LedgerError;
    use report::{ReportDetails, VerificationReport};
    use table::{CellValue, Column, ColumnType, DatasetFormat, Table};

    fn sample_report() -> VerificationReport {
        VerificationReport {
            dataset_hash: Digest::from_bytes([0xab; 32]),
            verification_hash: Digest::from_bytes([0x01; 32]),
            is_verified: true,
            quality_score: 100,
            analysis_report: "ipfs://mock-report".to_string(),
            details: ReportDetails {
                data_quality: QualityReport { missing_values: 0, incorrect_types: 1 },
                pii_detected: false,
                relevance: "Finance".to_string(),
                is_duplicate: false,
                bias: BiasVerdict::Balanced,
            },
        }
    }

    // ── Table ────────────────────────────────────────────────────────────────

    #[test]
    fn table_rejects_ragged_columns() {
        let result = Table::new(vec![
            Column::new("a", vec![CellValue::Int(1), CellValue::Int(2)]),
            Column::new("b", vec![CellValue::Int(1)]),
        ]);
        match result {
            Err(AttestError::MalformedInput { reason }) => {
                assert!(reason.contains("'b'"), "reason should name the column: {reason}");
            }
            other => panic!("expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn table_from_rows_transposes() {
        let table = Table::from_rows(
            &["price", "ticker"],
            vec![
                vec![CellValue::Float(1.5), "AAA".into()],
                vec![CellValue::Float(2.5), "BBB".into()],
            ],
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("ticker").unwrap().cells[1], CellValue::from("BBB"));
        assert_eq!(table.column("price").unwrap().column_type, ColumnType::Float);
    }

    #[test]
    fn column_type_inference() {
        assert_eq!(
            ColumnType::infer(&[CellValue::Int(1), CellValue::Null, CellValue::Int(3)]),
            ColumnType::Integer
        );
        assert_eq!(
            ColumnType::infer(&[CellValue::Int(1), CellValue::Float(2.5)]),
            ColumnType::Float
        );
        assert_eq!(
            ColumnType::infer(&[CellValue::Int(1), "x".into()]),
            ColumnType::Text
        );
        assert_eq!(ColumnType::infer(&[CellValue::Null, "  ".into()]), ColumnType::Null);
    }

    #[test]
    fn missing_cells() {
        assert!(CellValue::Null.is_missing());
        assert!(CellValue::Float(f64::NAN).is_missing());
        assert!(CellValue::from("").is_missing());
        assert!(CellValue::from("   ").is_missing());
        assert!(CellValue::from("\t ").is_missing());
        assert!(!CellValue::from(" a ").is_missing());
        assert!(!CellValue::Int(0).is_missing());
        assert!(!CellValue::from("0").is_missing());
    }

    #[test]
    fn dataset_format_from_extension() {
        assert_eq!(DatasetFormat::from_path(Path::new("a.csv")).unwrap(), DatasetFormat::Csv);
        assert_eq!(DatasetFormat::from_path(Path::new("a.JSON")).unwrap(), DatasetFormat::Json);
        assert_eq!(
            DatasetFormat::from_path(Path::new("dir/a.parquet")).unwrap(),
            DatasetFormat::Parquet
        );

        match DatasetFormat::from_path(Path::new("a.xlsx")) {
            Err(AttestError::UnsupportedFormat { extension }) => assert_eq!(extension, "xlsx"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
        assert!(DatasetFormat::from_path(Path::new("noext")).is_err());
    }

    // ── Digest ───────────────────────────────────────────────────────────────

    #[test]
    fn digest_display_and_parse() {
        let digest = Digest::from_bytes([0xab; 32]);
        let rendered = digest.to_string();
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len(), 66);

        let parsed: Digest = rendered.parse().unwrap();
        assert_eq!(parsed, digest);

        let unprefixed: Digest = digest.to_hex().parse().unwrap();
        assert_eq!(unprefixed, digest);

        assert!("0x1234".parse::<Digest>().is_err());
    }

    // ── Report wire shape ────────────────────────────────────────────────────

    #[test]
    fn report_serializes_with_wire_field_names() {
        let value = serde_json::to_value(sample_report()).unwrap();

        assert_eq!(value["datasetHash"], format!("0x{}", "ab".repeat(32)));
        assert_eq!(value["isVerified"], true);
        assert_eq!(value["qualityScore"], 100);
        assert_eq!(value["analysisReport"], "ipfs://mock-report");
        assert_eq!(value["details"]["dataQuality"]["missingValues"], 0);
        assert_eq!(value["details"]["dataQuality"]["incorrectTypes"], 1);
        assert_eq!(value["details"]["piiDetected"], false);
        assert_eq!(value["details"]["relevance"], "Finance");
        assert_eq!(value["details"]["isDuplicate"], false);
        assert_eq!(value["details"]["bias"], "Balanced");
    }

    // ── Relevance / entities ─────────────────────────────────────────────────

    #[test]
    fn relevance_labels() {
        assert_eq!(Relevance::Confirmed("Health".to_string()).label(), "Health");
        assert_eq!(Relevance::Unknown.label(), "Unknown");
        assert!(!Relevance::Unknown.matches_claim("Finance"));
    }

    #[test]
    fn entity_tags_map_to_labels() {
        assert_eq!(EntityLabel::from_tag("PERSON"), EntityLabel::Person);
        assert_eq!(EntityLabel::from_tag("gpe"), EntityLabel::Location);
        assert_eq!(EntityLabel::from_tag("ORG"), EntityLabel::Organization);
        assert_eq!(EntityLabel::from_tag("DATE"), EntityLabel::Other("DATE".to_string()));
        assert!(!EntityLabel::from_tag("CARDINAL").is_identifying());
    }

    // ── Errors ───────────────────────────────────────────────────────────────

    #[test]
    fn ledger_error_retryability() {
        assert!(LedgerError::Network { reason: "reset".to_string() }.is_retryable());
        assert!(!LedgerError::Rejected { reason: "dup".to_string() }.is_retryable());
        assert!(!LedgerError::Signing { reason: "no key".to_string() }.is_retryable());
    }

    #[test]
    fn ledger_submission_failed_keeps_report() {
        let err = AttestError::LedgerSubmissionFailed {
            source: LedgerError::Network { reason: "connection refused".to_string() },
            attempts: 3,
            report: Box::new(sample_report()),
        };
        let msg = err.to_string();
        assert!(msg.contains("3 attempt(s)"));
        assert!(msg.contains("connection refused"));

        if let AttestError::LedgerSubmissionFailed { report, .. } = err {
            assert_eq!(report.quality_score, 100);
        }
    }

    #[test]
    fn error_unsupported_format_display() {
        let err = AttestError::UnsupportedFormat { extension: "xlsx".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("unsupported file format"));
        assert!(msg.contains("xlsx"));
    }
}
