mod common;

use std::path::Path;

use medsafe::data::{
    dictionary::NameIndex,
    interactions::{InteractionDataset, BLOCKED_IDENTIFIERS},
    DataError,
};

#[test]
fn sentinel_labels_are_normalised() {
    let dir = common::fixture_dir();
    let dataset = common::load_dataset(dir.path(), 42);
    assert!(dataset.records().iter().all(|r| r.label <= 1));
    assert_eq!(dataset.stats().relabelled_rows, 2);
    let negatives = dataset.records().iter().filter(|r| r.label == 0).count();
    assert_eq!(negatives, 3);
}

#[test]
fn blocked_identifiers_are_filtered() {
    let dir = common::fixture_dir();
    let dataset = common::load_dataset(dir.path(), 42);
    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.stats().blocked_rows, 1);
    for record in dataset.records() {
        for id in &record.drug_identifiers {
            assert!(!BLOCKED_IDENTIFIERS.contains(&id.as_str()), "{id} leaked");
        }
    }
}

#[test]
fn shuffle_is_reproducible_for_a_seed() {
    let dir = common::fixture_dir();
    let first = common::load_dataset(dir.path(), 42);
    let second = common::load_dataset(dir.path(), 42);
    assert_eq!(first.records(), second.records());
}

#[test]
fn malformed_identifier_list_fails_loudly() {
    let positive = "DrugBankID,hyperedge_label\n\"['DB00682', 'DB00945'\",1\n";
    let negative = "DrugBankID,hyperedge_label\n";
    let err = InteractionDataset::from_readers(
        csv::Reader::from_reader(positive.as_bytes()),
        Path::new("pos.csv"),
        csv::Reader::from_reader(negative.as_bytes()),
        Path::new("neg.csv"),
        42,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::MalformedIdentifierList { row: 1, .. }));
}

#[test]
fn empty_identifier_field_is_rejected() {
    let positive = "DrugBankID,hyperedge_label\n,1\n";
    let negative = "DrugBankID,hyperedge_label\n";
    let err = InteractionDataset::from_readers(
        csv::Reader::from_reader(positive.as_bytes()),
        Path::new("pos.csv"),
        csv::Reader::from_reader(negative.as_bytes()),
        Path::new("neg.csv"),
        42,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::MalformedIdentifierList { .. }));
}

#[test]
fn sentinel_in_positive_table_is_an_error() {
    let positive = "DrugBankID,hyperedge_label\n\"['DB1']\",-1\n";
    let negative = "DrugBankID,hyperedge_label\n";
    let err = InteractionDataset::from_readers(
        csv::Reader::from_reader(positive.as_bytes()),
        Path::new("pos.csv"),
        csv::Reader::from_reader(negative.as_bytes()),
        Path::new("neg.csv"),
        42,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::UnexpectedLabel { label: -1, .. }));
}

#[test]
fn missing_table_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = InteractionDataset::load(
        &dir.path().join("pos.csv"),
        &dir.path().join("neg.csv"),
        42,
    )
    .unwrap_err();
    assert!(matches!(err, DataError::Csv { .. }));
}

#[test]
fn name_index_is_restricted_to_interaction_drugs() {
    let dir = common::fixture_dir();
    let dataset = common::load_dataset(dir.path(), 42);
    let index = common::load_index(dir.path(), &dataset);
    assert_eq!(
        index.names().collect::<Vec<_>>(),
        ["Warfarin", "Aspirin", "Amiodarone", "Digoxin"]
    );
    assert_eq!(index.id_for("Lepirudin"), None);
    assert_eq!(index.id_for("Tiopronin"), None);
}

#[test]
fn name_index_round_trips() {
    let dir = common::fixture_dir();
    let dataset = common::load_dataset(dir.path(), 42);
    let index: NameIndex = common::load_index(dir.path(), &dataset);
    for name in index.names() {
        let id = index.id_for(name).unwrap();
        assert_eq!(index.name_for(id), Some(name));
    }
    for id in dataset.identifiers() {
        let name = index.name_for(id).unwrap();
        assert_eq!(index.id_for(name), Some(id));
    }
}
