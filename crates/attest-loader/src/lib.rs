//! # attest-loader
//!
//! Reads CSV, JSON and Parquet files into attestation [`Table`]s using
//! polars.
//!
//! The format is chosen from the file extension alone. Column types come
//! from polars' schema inference; cells are converted one by one into
//! [`CellValue`]s.

use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use attest_contracts::{
    error::{AttestError, AttestResult},
    table::{CellValue, Column as TableColumn, ColumnType, DatasetFormat, LoadedTable, Table},
};
use attest_core::traits::TableLoader;

/// Rows sampled by the CSV reader when inferring column types.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

/// `TableLoader` backed by polars' eager readers.
#[derive(Debug, Clone)]
pub struct PolarsTableLoader {
    infer_schema_length: usize,
}

impl Default for PolarsTableLoader {
    fn default() -> Self {
        Self { infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH }
    }
}

impl PolarsTableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_infer_schema_length(mut self, rows: usize) -> Self {
        self.infer_schema_length = rows;
        self
    }

    fn read_frame(&self, path: &Path, format: DatasetFormat) -> AttestResult<DataFrame> {
        let malformed = |e: PolarsError| AttestError::MalformedInput {
            reason: format!("failed to read {} file '{}': {}", format, path.display(), e),
        };

        match format {
            DatasetFormat::Csv => CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(self.infer_schema_length))
                .try_into_reader_with_file_path(Some(path.to_path_buf()))
                .and_then(|reader| reader.finish())
                .map_err(malformed),
            DatasetFormat::Json => JsonReader::new(open(path)?).finish().map_err(malformed),
            DatasetFormat::Parquet => ParquetReader::new(open(path)?).finish().map_err(malformed),
        }
    }
}

impl TableLoader for PolarsTableLoader {
    fn load(&self, path: &Path) -> AttestResult<LoadedTable> {
        let format = DatasetFormat::from_path(path)?;
        let byte_size = std::fs::metadata(path)
            .map_err(|e| AttestError::MalformedInput {
                reason: format!("cannot stat '{}': {}", path.display(), e),
            })?
            .len();

        let frame = self.read_frame(path, format)?;
        let table = table_from_frame(&frame)?;

        debug!(
            path = %path.display(),
            %format,
            rows = table.row_count(),
            columns = table.column_count(),
            byte_size,
            "dataset file parsed"
        );

        Ok(LoadedTable { table, format, byte_size })
    }
}

fn open(path: &Path) -> AttestResult<File> {
    File::open(path).map_err(|e| AttestError::MalformedInput {
        reason: format!("cannot open '{}': {}", path.display(), e),
    })
}

/// Convert a polars frame into a `Table`, preserving column order.
pub fn table_from_frame(frame: &DataFrame) -> AttestResult<Table> {
    let columns = frame
        .get_columns()
        .iter()
        .map(|column| {
            let series = column.as_materialized_series();
            let cells = (0..series.len())
                .map(|idx| {
                    series.get(idx).map(cell_from_any).map_err(|e| AttestError::MalformedInput {
                        reason: format!("column '{}' row {}: {}", series.name(), idx, e),
                    })
                })
                .collect::<AttestResult<Vec<_>>>()?;

            let column_type = if !cells.is_empty() && cells.iter().all(CellValue::is_missing) {
                ColumnType::Null
            } else {
                column_type(series.dtype())
            };
            Ok(TableColumn::with_type(series.name().to_string(), column_type, cells))
        })
        .collect::<AttestResult<Vec<_>>>()?;

    Table::new(columns)
}

fn column_type(dtype: &DataType) -> ColumnType {
    if dtype.is_bool() {
        ColumnType::Boolean
    } else if dtype.is_integer() {
        ColumnType::Integer
    } else if dtype.is_float() {
        ColumnType::Float
    } else if dtype.is_temporal() {
        ColumnType::Temporal
    } else if matches!(dtype, DataType::Null) {
        ColumnType::Null
    } else {
        ColumnType::Text
    }
}

fn cell_from_any(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Null,
        AnyValue::Boolean(b) => CellValue::Bool(b),
        AnyValue::String(s) => CellValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
        AnyValue::Int8(v) => CellValue::Int(v.into()),
        AnyValue::Int16(v) => CellValue::Int(v.into()),
        AnyValue::Int32(v) => CellValue::Int(v.into()),
        AnyValue::Int64(v) => CellValue::Int(v),
        AnyValue::UInt8(v) => CellValue::Int(v.into()),
        AnyValue::UInt16(v) => CellValue::Int(v.into()),
        AnyValue::UInt32(v) => CellValue::Int(v.into()),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => CellValue::Int(v),
            Err(_) => CellValue::Float(v as f64),
        },
        AnyValue::Float32(v) => CellValue::Float(v.into()),
        AnyValue::Float64(v) => CellValue::Float(v),
        // Dates, times and nested values keep their polars rendering.
        other => CellValue::Text(other.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use polars::prelude::*;

    use attest_contracts::{
        error::AttestError,
        table::{CellValue, ColumnType, DatasetFormat},
    };
    use attest_core::{digest::dataset_hash, traits::TableLoader};

    use super::PolarsTableLoader;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_csv_is_loaded_with_inferred_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "prices.csv",
            "stock_price,volume,gender,note\n10.5,100,F,ok\n11.0,200,M,\n12.25,300,F,fine\n",
        );

        let loaded = PolarsTableLoader::new().load(&path).unwrap();
        let table = &loaded.table;

        assert_eq!(loaded.format, DatasetFormat::Csv);
        assert_eq!(loaded.byte_size, std::fs::metadata(&path).unwrap().len());
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names().collect::<Vec<_>>(), ["stock_price", "volume", "gender", "note"]);

        assert_eq!(table.column("stock_price").unwrap().column_type, ColumnType::Float);
        assert_eq!(table.column("volume").unwrap().column_type, ColumnType::Integer);
        assert_eq!(table.column("gender").unwrap().column_type, ColumnType::Text);
        assert_eq!(table.column("volume").unwrap().cells[1], CellValue::Int(200));
        assert!(table.column("note").unwrap().cells[1].is_missing());
    }

    #[test]
    fn test_uppercase_extension_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "DATA.CSV", "a,b\n1,2\n");

        let loaded = PolarsTableLoader::new().load(&path).unwrap();
        assert_eq!(loaded.format, DatasetFormat::Csv);
        assert_eq!(loaded.table.column_count(), 2);
    }

    #[test]
    fn test_all_empty_column_is_null_typed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "gaps.csv", "price,comment\n1.0,\n2.0,\n");

        let table = PolarsTableLoader::new().load(&path).unwrap().table;
        assert_eq!(table.column("comment").unwrap().column_type, ColumnType::Null);
    }

    #[test]
    fn test_json_records_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "records.json",
            r#"[{"price": 1.5, "contact": "john.doe@example.com"}, {"price": 2.5, "contact": "n/a"}]"#,
        );

        let loaded = PolarsTableLoader::new().load(&path).unwrap();
        assert_eq!(loaded.format, DatasetFormat::Json);
        assert_eq!(loaded.table.row_count(), 2);
        assert_eq!(
            loaded.table.column("contact").unwrap().cells[0],
            CellValue::Text("john.doe@example.com".to_string())
        );
        assert_eq!(loaded.table.column("price").unwrap().column_type, ColumnType::Float);
    }

    #[test]
    fn test_parquet_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.parquet");
        let mut frame = df!(
            "price" => [1.5f64, 2.5, 3.5],
            "gender" => ["F", "M", "F"]
        )
        .unwrap();
        ParquetWriter::new(std::fs::File::create(&path).unwrap()).finish(&mut frame).unwrap();

        let loaded = PolarsTableLoader::new().load(&path).unwrap();
        assert_eq!(loaded.format, DatasetFormat::Parquet);
        assert_eq!(loaded.table.row_count(), 3);
        assert_eq!(loaded.table.column("gender").unwrap().cells[1], CellValue::Text("M".to_string()));
    }

    #[test]
    fn test_same_content_same_identity_across_paths() {
        let dir = tempfile::tempdir().unwrap();
        let contents = "stock_price,gender\n1.0,F\n2.0,M\n";
        let a = write_file(dir.path(), "a.csv", contents);
        let b = write_file(dir.path(), "b.csv", contents);

        let loader = PolarsTableLoader::new();
        let hash_a = dataset_hash(&loader.load(&a).unwrap().table);
        let hash_b = dataset_hash(&loader.load(&b).unwrap().table);
        assert_eq!(hash_a, hash_b);
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "sheet.xlsx", "not really a spreadsheet");

        let err = PolarsTableLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, AttestError::UnsupportedFormat { ref extension } if extension == "xlsx"));
    }

    #[test]
    fn test_missing_file_is_malformed_input() {
        let err = PolarsTableLoader::new().load(Path::new("/nonexistent/data.csv")).unwrap_err();
        assert!(matches!(err, AttestError::MalformedInput { .. }));
    }

    #[test]
    fn test_unparseable_json_is_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "broken.json", "{ this is not json");

        let err = PolarsTableLoader::new().load(&path).unwrap_err();
        assert!(matches!(err, AttestError::MalformedInput { .. }));
    }
}
