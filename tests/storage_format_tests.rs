// Writer and reader behaviour of the strata file format

use std::fs;
use std::path::Path;
use strata_core::{CompressionType, DataType, Error, Field, RowBatch, Schema};
use strata_storage::{FileReader, FileWriter, ReaderOptions, WriterOptions};

fn write_values(path: &Path, data_type: DataType, values: &[Option<&str>], compression: CompressionType) {
    let schema = Schema::single("value", data_type);
    let mut writer = FileWriter::create(path, WriterOptions::new(schema.clone()).compression(compression).block_rows(3)).unwrap();
    let mut batch = schema.create_row_batch(values.len().max(1));
    for value in values {
        let row = batch.size;
        batch.columns[0].set_optional(row, value.map(str::as_bytes)).unwrap();
        batch.size += 1;
    }
    writer.append_batch(&batch).unwrap();
    writer.close().unwrap();
}

fn read_values(path: &Path, options: ReaderOptions, capacity: usize) -> Vec<Option<String>> {
    let mut reader = FileReader::open(path, options).unwrap();
    let mut batch = reader.schema().create_row_batch(capacity);
    let mut out = Vec::new();
    while reader.next_batch(&mut batch).unwrap() {
        for row in 0..batch.size {
            out.push(batch.columns[0].read_as_text(row).unwrap());
        }
    }
    reader.close().unwrap();
    out
}

#[test]
fn test_char_stored_unpadded_and_padded_on_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("char.strata");
    write_values(&path, DataType::Char(4), &[Some("αβ"), Some("🌻🐝🍯🍺🥃"), None], CompressionType::None);

    let padded = read_values(&path, ReaderOptions::default().rtrim_char(false), 2);
    assert_eq!(padded, vec![Some("αβ  ".to_string()), Some("🌻🐝🍯🍺".to_string()), None]);

    let trimmed = read_values(&path, ReaderOptions::default(), 2);
    assert_eq!(trimmed, vec![Some("αβ".to_string()), Some("🌻🐝🍯🍺".to_string()), None]);
}

#[test]
fn test_varchar_never_padded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("varchar.strata");
    write_values(&path, DataType::Varchar(3), &[Some("a"), Some("എന്താ")], CompressionType::LZ4);

    let values = read_values(&path, ReaderOptions::default().rtrim_char(false), 8);
    assert_eq!(values, vec![Some("a".to_string()), Some("എന്".to_string())]);
}

#[test]
fn test_unbounded_string_stored_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("string.strata");
    write_values(&path, DataType::String, &[Some("αβγδ  ")], CompressionType::Snappy);

    assert_eq!(read_values(&path, ReaderOptions::default(), 1), vec![Some("αβγδ  ".to_string())]);
}

#[test]
fn test_reader_reports_schema_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meta.strata");
    write_values(&path, DataType::Varchar(2), &[Some("a"), Some("b"), Some("c"), Some("d")], CompressionType::Zstd);

    let reader = FileReader::open(&path, ReaderOptions::default()).unwrap();
    assert_eq!(reader.row_count(), 4);
    assert_eq!(reader.schema().fields, vec![Field::new("value", DataType::Varchar(2))]);
    reader.close().unwrap();
}

#[test]
fn test_truncated_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cut.strata");
    write_values(&path, DataType::Varchar(2), &[Some("a"), Some("b")], CompressionType::None);

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();
    assert!(matches!(
        FileReader::open(&path, ReaderOptions::default()),
        Err(Error::Deserialization(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = FileReader::open(dir.path().join("absent.strata"), ReaderOptions::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_writer_rejects_wrong_column_count() {
    let dir = tempfile::tempdir().unwrap();
    let schema = Schema::single("value", DataType::Char(2));
    let mut writer = FileWriter::create(dir.path().join("w.strata"), WriterOptions::new(schema)).unwrap();
    let batch = RowBatch::new(2, 4);
    assert!(matches!(writer.append_batch(&batch), Err(Error::SchemaMismatch(_))));
}

#[test]
fn test_reader_rejects_wrong_column_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("r.strata");
    write_values(&path, DataType::Char(2), &[Some("a")], CompressionType::None);

    let mut reader = FileReader::open(&path, ReaderOptions::default()).unwrap();
    let mut batch = RowBatch::new(3, 4);
    assert!(matches!(reader.next_batch(&mut batch), Err(Error::SchemaMismatch(_))));
}
