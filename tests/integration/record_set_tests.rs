//! RecordSet persistence and curation tests

use pubmed_records_rs::{MedlineRecord, PubMedError, RecordSet};
use tempfile::TempDir;

const FIXTURE: &str = "tests/integration/test_data/sample_records.json";

fn load_fixture() -> RecordSet {
    RecordSet::load(FIXTURE).expect("should load record fixture")
}

#[test]
fn test_load_fixture() {
    let records = load_fixture();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].pmid(), Some("23370058"));
    assert_eq!(records[1].pmid(), Some("21492488"));
    assert_eq!(records[2].pmid(), Some("25408440"));
    assert_eq!(records[2].year(), Some(2015));
}

#[test]
fn test_save_and_reload_preserves_records() {
    let tempdir = TempDir::new().unwrap();
    let path = tempdir.path().join("roundtrip.json");

    let records = load_fixture();
    records.save(&path).unwrap();
    let reloaded = RecordSet::load(&path).unwrap();

    assert_eq!(records, reloaded);
}

#[test]
fn test_save_skips_excluded_records() {
    let tempdir = TempDir::new().unwrap();
    let path = tempdir.path().join("filtered.json");

    let mut records = load_fixture();
    records.mark_excluded(1);
    records.save(&path).unwrap();

    let reloaded = RecordSet::load(&path).unwrap();
    assert_eq!(reloaded.len(), 2);
    let pmids: Vec<_> = reloaded.iter().filter_map(MedlineRecord::pmid).collect();
    assert_eq!(pmids, vec!["23370058", "25408440"]);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let result = RecordSet::load("does/not/exist.json");
    assert!(matches!(result, Err(PubMedError::IoError(_))));
}

#[test]
fn test_load_invalid_json_is_json_error() {
    let tempdir = TempDir::new().unwrap();
    let path = tempdir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();

    let result = RecordSet::load(&path);
    assert!(matches!(result, Err(PubMedError::JsonError(_))));
}

#[test]
fn test_filter_pipeline() {
    // Keep abstracts about brains published after 2012, as in a typical
    // curation session
    let records = load_fixture();

    let mut selected: RecordSet = records
        .iter()
        .filter(|r| r.contains("AB"))
        .cloned()
        .collect();
    assert_eq!(selected.len(), 2);

    selected.retain(|r| r.year().is_some_and(|y| y > 2012)).unwrap();
    let selected = selected.find("brain").unwrap();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].pmid(), Some("23370058"));
}

#[test]
fn test_merge_then_dedup_unique_combination() {
    let records = load_fixture();

    let mut first: RecordSet = records.iter().take(2).cloned().collect();
    let second: RecordSet = records.iter().skip(1).cloned().collect();

    first.merge(second).unwrap();
    assert_eq!(first.len(), 4);

    first.dedup_by_pmid().unwrap();
    assert_eq!(first, records);
}

#[test]
fn test_summary_line() {
    let records = load_fixture();
    assert_eq!(format!("{records}"), "<Records | 3 entries | 2015 - 2011>");
}
