use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, FieldValue, Row};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line (the usual iris layout)
/// * `.json`    – `[{ "sepal width": 3.5, "species": "setosa", ... }, ...]`
/// * `.parquet` – flat scalar columns (strings, ints, floats, bools)
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.column_names,
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every other row a record.
/// Cell types are guessed per value (int, float, bool, string, empty → null).
fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Parse CSV from any reader; split out so tests can feed in-memory text.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let mut rows = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_field_type(value)))
            .collect();

        rows.push(row);
    }

    Ok(Dataset::with_columns(headers, rows))
}

fn guess_field_type(raw: &str) -> FieldValue {
    let s = raw.trim();
    if s.is_empty() {
        return FieldValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return FieldValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return FieldValue::Float(f);
    }
    if s == "true" || s == "false" {
        return FieldValue::Bool(s == "true");
    }
    FieldValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "sepal length": 5.1, "sepal width": 3.5, "species": "setosa" },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let row: Row = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_field(val)))
            .collect();
        rows.push(row);
    }

    Ok(Dataset::from_rows(rows))
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => guess_field_type(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => FieldValue::Bool(*b),
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat scalar columns.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested or exotic column types are
/// kept as their type name so the column still shows up as categorical.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        for row in 0..batch.num_rows() {
            let record: Row = schema
                .fields()
                .iter()
                .enumerate()
                .map(|(col_idx, field)| {
                    (field.name().clone(), extract_field_value(batch.column(col_idx), row))
                })
                .collect();
            rows.push(record);
        }
    }

    Ok(Dataset::with_columns(column_names, rows))
}

/// Extract a single value from an Arrow column at a given row.
fn extract_field_value(col: &Arc<dyn Array>, row: usize) -> FieldValue {
    if col.is_null(row) {
        return FieldValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => match any.downcast_ref::<StringArray>() {
            Some(s) => FieldValue::String(s.value(row).to_string()),
            None => FieldValue::Null,
        },
        DataType::LargeUtf8 => FieldValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map_or(FieldValue::Null, |a| FieldValue::Integer(a.value(row) as i64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map_or(FieldValue::Null, |a| FieldValue::Integer(a.value(row))),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map_or(FieldValue::Null, |a| FieldValue::Float(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map_or(FieldValue::Null, |a| FieldValue::Float(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map_or(FieldValue::Null, |a| FieldValue::Bool(a.value(row))),
        other => FieldValue::String(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRIS: &str = "\
sepal length,sepal width,petal length,petal width,species
5.1,3.5,1.4,0.2,setosa
4.9,3.0,1.4,0.2,setosa
7.0,3.2,4.7,1.4,versicolor
";

    fn csv_from_str(text: &str) -> Result<Dataset> {
        read_csv(csv::Reader::from_reader(text.as_bytes()))
    }

    #[test]
    fn csv_keeps_header_order_and_types() {
        let ds = csv_from_str(IRIS).expect("parse csv");
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.column_names,
            vec!["sepal length", "sepal width", "petal length", "petal width", "species"]
        );
        assert_eq!(ds.rows[0].number("sepal width"), Some(3.5));
        assert_eq!(
            ds.rows[2].get("species"),
            Some(&FieldValue::String("versicolor".into()))
        );
    }

    #[test]
    fn csv_empty_cell_is_null() {
        let ds = csv_from_str("a,b\n1,\n2,3\n").expect("parse csv");
        assert_eq!(ds.rows[0].get("b"), Some(&FieldValue::Null));
        assert_eq!(ds.rows[1].number("b"), Some(3.0));
    }

    #[test]
    fn csv_ragged_row_is_an_error() {
        let err = csv_from_str("a,b\n1,2\n3\n").unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }

    #[test]
    fn json_records_parse_and_numeric_strings_are_numbers() {
        let ds = parse_json(
            r#"[{"sepal width": "3.5", "species": "setosa"},
                {"sepal width": 3, "species": "setosa", "extra": null}]"#,
        )
        .expect("parse json");
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].number("sepal width"), Some(3.5));
        assert_eq!(ds.rows[1].number("sepal width"), Some(3.0));
        assert!(ds.has_column("extra"));
    }

    #[test]
    fn json_rejects_non_array_root() {
        assert!(parse_json(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn unsupported_extension_is_reported() {
        let err = load_file(Path::new("table.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn load_file_reads_csv_from_disk() {
        let path = std::env::temp_dir().join("rusty_splom_loader_test.csv");
        std::fs::write(&path, IRIS).expect("write fixture");
        let ds = load_file(&path).expect("load csv");
        assert_eq!(ds.len(), 3);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn load_file_reads_parquet_columns_in_schema_order() {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("species", DataType::Utf8, true),
            Field::new("count", DataType::Int32, true),
            Field::new("sepal width", DataType::Float32, true),
        ]));
        let columns: Vec<Arc<dyn Array>> = vec![
            Arc::new(StringArray::from(vec![Some("setosa"), None])),
            Arc::new(Int32Array::from(vec![Some(7), Some(9)])),
            Arc::new(Float32Array::from(vec![Some(3.5), None])),
        ];
        let batch = RecordBatch::try_new(schema.clone(), columns).expect("record batch");

        let path = std::env::temp_dir().join("rusty_splom_loader_test.parquet");
        let file = std::fs::File::create(&path).expect("create fixture");
        let mut writer = ArrowWriter::try_new(file, schema, None).expect("parquet writer");
        writer.write(&batch).expect("write batch");
        writer.close().expect("close writer");

        let ds = load_file(&path).expect("load parquet");
        std::fs::remove_file(&path).ok();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column_names, vec!["species", "count", "sepal width"]);
        assert_eq!(ds.rows[0].get("species"), Some(&FieldValue::String("setosa".into())));
        assert_eq!(ds.rows[0].get("count"), Some(&FieldValue::Integer(7)));
        assert_eq!(ds.rows[0].number("sepal width"), Some(3.5));
        assert_eq!(ds.rows[1].get("species"), Some(&FieldValue::Null));
        assert_eq!(ds.rows[1].get("sepal width"), Some(&FieldValue::Null));
        assert_eq!(ds.numeric_columns(), vec!["count", "sepal width"]);
    }

    #[test]
    fn infinite_csv_values_do_not_break_domains() {
        let ds = csv_from_str("sepal width,species\n2.0,setosa\ninf,setosa\n3.0,virginica\n")
            .expect("parse csv");
        let domain = crate::data::metrics::extent(&ds, "sepal width").expect("extent");
        assert_eq!(domain, crate::data::metrics::Domain::new(2.0, 3.0));
    }
}
