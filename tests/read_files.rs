//! Reading delimited and fixed-width files from disk.

use std::fs;

use csvparts_rs::{
    Charset, CodecConfig, CodecError, Condition, CsvReader, MemoryReporter, Record, WidthUnit,
};
use tempfile::tempdir;

fn write_sjis(path: &std::path::Path, text: &str) {
    fs::write(path, Charset::default().encode(text)).unwrap();
}

#[test]
fn test_reads_windows_31j_by_default() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("members.csv");
    write_sjis(&path, "氏名,所属\r\n山田,\"営業,東京\"\r\n");

    let mut reader = CsvReader::open(&path, None, &CodecConfig::default()).unwrap();
    let all = reader.read_all().unwrap();
    assert_eq!(
        all,
        vec![
            Record::from_fields(["氏名", "所属"]),
            Record::from_fields(["山田", "営業,東京"]),
        ]
    );
    reader.close();
    reader.close();
}

#[test]
fn test_quoted_field_across_crlf_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("memo.csv");
    fs::write(&path, "1,\"line one\r\nline two\",end\r\n2,x\r\n").unwrap();

    let mut reader = CsvReader::open(&path, Some("UTF-8"), &CodecConfig::default()).unwrap();
    let first = reader.read_record().unwrap().unwrap();
    assert_eq!(first.fields(), ["1", "line one\nline two", "end"]);
    let second = reader.read_record().unwrap().unwrap();
    assert_eq!(second.fields(), ["2", "x"]);
    assert!(reader.read_record().unwrap().is_none());
}

#[test]
fn test_fixed_width_byte_mode_on_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fixed.dat");
    write_sjis(&path, "鈴木    0012\r\n佐藤一郎0345\r\n");

    let config = CodecConfig::default().with_width_unit(WidthUnit::Byte);
    let mut reader = CsvReader::open(&path, Some("Shift_JIS"), &config).unwrap();
    let all = reader.read_all_fixed(&[8, 4]).unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].fields(), ["鈴木    ", "0012"]);
    assert_eq!(all[1].fields(), ["佐藤一郎", "0345"]);
}

#[test]
fn test_missing_file_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let reporter = MemoryReporter::new();
    let result = CsvReader::open_with_reporter(
        &path,
        None,
        &CodecConfig::default(),
        Box::new(reporter.clone()),
    );
    assert!(matches!(result, Err(CodecError::Io { .. })));
    assert_eq!(reporter.conditions(), vec![Condition::MissingFile { path }]);
}

#[test]
fn test_file_size_limit_is_strict() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ten.csv");
    fs::write(&path, "0123456789").unwrap();

    let at_limit = CodecConfig::default().with_max_file_size(10);
    let reader = CsvReader::open(&path, Some("UTF-8"), &at_limit).unwrap();
    assert!(!reader.is_correct_file_size());

    let above = CodecConfig::default().with_max_file_size(11);
    let reader = CsvReader::open(&path, Some("UTF-8"), &above).unwrap();
    assert!(reader.is_correct_file_size());
}
