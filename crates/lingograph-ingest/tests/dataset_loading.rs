use lingograph_ingest::{build_entities, load_dataset, IngestError, RecordKind};
use std::io::Write;

const DATASET: &str = r#"{
  "languages": [
    { "code": "sjn", "name": "Sindarin (Grey-elven)", "population_cited": 9000 },
    { "code": "sjn", "name": "Sindarin again" },
    { "code": "", "name": "Nameless" }
  ],
  "locales": [
    ["sjn_BE", "Sindarin (Beleriand)", "", "census", "9,000", "official"],
    ["sjn_ER", "", "", "rumour", "600", ""],
    ["sjn_BE_x"]
  ],
  "territories": [
    { "code": "BE", "name": "Beleriand", "scope": "country", "population": 12000 },
    { "code": "XX", "name": "Nowhere", "scope": "planet" }
  ]
}"#;

#[test]
fn load_dataset_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(DATASET.as_bytes()).expect("write dataset");

    let dataset = load_dataset(file.path()).expect("dataset loads");
    assert_eq!(dataset.languages.len(), 3);
    assert_eq!(dataset.locales.len(), 3);
    assert!(dataset.census_batches.is_empty());
}

#[test]
fn missing_file_is_an_error_with_context() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");
    let err = load_dataset(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.json"));
}

#[test]
fn invalid_json_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(b"{ not json").expect("write");
    assert!(load_dataset(file.path()).is_err());
}

#[test]
fn bad_rows_are_dropped_or_degraded() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(DATASET.as_bytes()).expect("write dataset");
    let entities = build_entities(&load_dataset(file.path()).expect("dataset loads"));

    assert_eq!(entities.languages.len(), 1);
    assert_eq!(entities.languages[0].name_subtitle.as_deref(), Some("Grey-elven"));
    assert_eq!(entities.locales.len(), 2);
    assert_eq!(entities.locales[0].population_cited, Some(9000));
    assert_eq!(entities.territories.len(), 1);

    let dropped: Vec<_> = entities.issues.iter().filter(|i| i.dropped).collect();
    assert!(dropped.iter().any(|i| i.record == RecordKind::Language
        && matches!(i.error, IngestError::DuplicateId { .. })));
    assert!(dropped
        .iter()
        .any(|i| i.record == RecordKind::Language && i.error == IngestError::MissingField("code")));
    assert!(dropped.iter().any(|i| i.record == RecordKind::Locale
        && i.error == IngestError::FieldCount { expected: 6, found: 1 }));
    assert!(dropped.iter().any(|i| i.record == RecordKind::Territory));

    let kept = entities
        .issues
        .iter()
        .find(|i| !i.dropped)
        .expect("unknown population source is kept");
    assert_eq!(kept.record, RecordKind::Locale);
    assert_eq!(kept.index, 1);
}
