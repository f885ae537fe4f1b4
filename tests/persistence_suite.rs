use bills_core::schedule::{
    generate, BillIntent, ChangeKind, Direction, HistorySnapshot, PaymentMode, PlanGroup,
};
use bills_core::storage::{GroupStore, JsonStorage};
use chrono::NaiveDate;
use serde_json::Value;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn store() -> (JsonStorage, TempDir) {
    let temp = TempDir::new().expect("temp dir");
    let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
    (storage, temp)
}

fn sample_group() -> PlanGroup {
    let intent = BillIntent::new(
        Direction::Payable,
        "Utilities",
        75_000,
        date(2025, 2, 10),
        PaymentMode::FixedTotal,
    )
    .with_count(5);
    PlanGroup::new(&intent, generate(&intent).unwrap())
}

#[test]
fn group_roundtrip_is_lossless() {
    let (storage, _guard) = store();
    let mut group = sample_group();
    group.installment_mut(1).unwrap().mark_paid(date(2025, 2, 10));
    storage.save(&group).expect("save group");
    let loaded = storage.load(group.id).expect("load group");

    let original_json: Value = serde_json::to_value(&group).unwrap();
    let loaded_json: Value = serde_json::to_value(&loaded).unwrap();
    assert_eq!(original_json, loaded_json);
}

#[test]
fn paid_installments_roundtrip_byte_identical() {
    let (storage, _guard) = store();
    let mut group = sample_group();
    group.installment_mut(1).unwrap().mark_paid(date(2025, 2, 10));
    group.installment_mut(2).unwrap().mark_paid(date(2025, 3, 10));
    let paid_json = serde_json::to_string(&group.paid().cloned().collect::<Vec<_>>()).unwrap();

    storage.commit(&group, None).expect("commit");
    let loaded = storage.load(group.id).expect("load");
    let loaded_paid_json =
        serde_json::to_string(&loaded.paid().cloned().collect::<Vec<_>>()).unwrap();
    assert_eq!(loaded_paid_json, paid_json);
}

#[test]
fn commit_with_snapshot_persists_both() {
    let (storage, _guard) = store();
    let group = sample_group();
    storage.commit(&group, None).expect("initial commit");

    let snapshot = HistorySnapshot::capture(&group, ChangeKind::ValueChange);
    let mut revised = group.clone();
    revised.installments[4].amount_cents += 1_000;
    revised.touch();
    storage
        .commit(&revised, Some(&snapshot))
        .expect("commit with history");

    let loaded = storage.load(group.id).expect("load");
    assert_eq!(loaded.installments[4].amount_cents, group.installments[4].amount_cents + 1_000);

    let history = storage.history(group.id).expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, snapshot.id);
    assert_eq!(history[0].installments, group.installments);
}

#[test]
fn failed_group_write_leaves_no_orphan_snapshot() {
    let (storage, _guard) = store();
    let group = sample_group();
    storage.commit(&group, None).expect("initial commit");

    // Occupy the group's path with a directory so the file swap cannot land.
    let path = storage.group_path(group.id);
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir(&path).unwrap();

    let snapshot = HistorySnapshot::capture(&group, ChangeKind::ValueChange);
    storage
        .commit(&group, Some(&snapshot))
        .expect_err("commit must fail when the group cannot be written");
    assert!(
        storage.history(group.id).expect("history").is_empty(),
        "a failed commit must not leave its snapshot behind"
    );
}

#[test]
fn history_files_are_append_only() {
    let (storage, _guard) = store();
    let group = sample_group();
    storage.commit(&group, None).expect("initial commit");

    let snapshot = HistorySnapshot::capture(&group, ChangeKind::CountChange);
    storage
        .commit(&group, Some(&snapshot))
        .expect("first write");
    // Re-persisting the identical snapshot must not silently overwrite it.
    let err = storage.commit(&group, Some(&snapshot)).unwrap_err();
    assert!(matches!(err, bills_core::errors::ScheduleError::Storage(_)));
    assert_eq!(storage.history(group.id).expect("history").len(), 1);
}

#[test]
fn history_spans_multiple_groups_independently() {
    let (storage, _guard) = store();
    let group_a = sample_group();
    let group_b = sample_group();
    storage.commit(&group_a, None).unwrap();
    storage.commit(&group_b, None).unwrap();

    let snapshot_a = HistorySnapshot::capture(&group_a, ChangeKind::ValueChange);
    storage.commit(&group_a, Some(&snapshot_a)).unwrap();

    assert_eq!(storage.history(group_a.id).unwrap().len(), 1);
    assert!(storage.history(group_b.id).unwrap().is_empty());

    let mut ids = storage.list_groups().unwrap();
    ids.sort();
    let mut expected = vec![group_a.id, group_b.id];
    expected.sort();
    assert_eq!(ids, expected);
}
