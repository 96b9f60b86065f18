//! MEDLINE flat-file parsing tests using a real-format fixture

use pubmed_records_rs::{ExportFormat, FieldValue, RecordSet, parse_medline};
use std::fs;

const FIXTURE: &str = "tests/integration/test_data/sample_medline.txt";

fn fixture_text() -> String {
    fs::read_to_string(FIXTURE).expect("should read MEDLINE fixture")
}

#[test]
fn test_parse_fixture_records() {
    let records = parse_medline(&fixture_text()).unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.pmid(), Some("23370058"));
    assert_eq!(first.year(), Some(2013));
    assert_eq!(
        first.get("TI").unwrap().first(),
        Some("Diffusion kurtosis imaging of the healthy human brain.")
    );
    assert_eq!(
        first.get("AU"),
        Some(&FieldValue::Many(vec![
            "Engemann DA".to_string(),
            "Bzdok D".to_string()
        ]))
    );
    assert_eq!(
        first.doi(),
        Some("10.1016/j.neuroimage.2012.10.006".to_string())
    );

    let second = &records[1];
    assert_eq!(second.pmid(), Some("21492488"));
    assert_eq!(second.doi(), Some("10.1186/1532-429X-13-30".to_string()));
    assert_eq!(
        second.get("AB").unwrap().first(),
        Some("Cardiac magnetic resonance imaging protocols were compared across sites.")
    );
}

#[test]
fn test_fixture_matches_json_fixture() {
    // The MEDLINE fixture and the JSON fixture describe the same records
    let from_medline = RecordSet::from_medline(&fixture_text()).unwrap();
    let from_json = RecordSet::load("tests/integration/test_data/sample_records.json").unwrap();

    assert_eq!(from_medline[0], from_json[0]);
    assert_eq!(from_medline[1], from_json[1]);
}

#[test]
fn test_nbib_export_round_trips() {
    let records = parse_medline(&fixture_text()).unwrap();

    for record in &records {
        let nbib = record.to_nbib();
        let reparsed = parse_medline(&nbib).unwrap();
        assert_eq!(reparsed.len(), 1);
        assert_eq!(&reparsed[0], record);
    }
}

#[test]
fn test_corpus_and_match_on_parsed_records() {
    let records = RecordSet::from_medline(&fixture_text()).unwrap();

    let brains = records.find("brain").unwrap();
    assert_eq!(brains.len(), 1);
    assert_eq!(brains[0].pmid(), Some("23370058"));

    let imaging = records.find("imaging").unwrap();
    assert_eq!(imaging.len(), 2);
}
