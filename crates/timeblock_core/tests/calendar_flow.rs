use timeblock_core::db::{open_db, open_db_in_memory};
use timeblock_core::{
    CalendarService, CalendarSnapshot, Priority, ServiceError, SqliteBlockRepository, TimeBlock,
};

const HOUR_MS: i64 = 60 * 60 * 1000;
const MINUTE_MS: i64 = 60 * 1000;

fn at(hour: i64, minute: i64) -> i64 {
    hour * HOUR_MS + minute * MINUTE_MS
}

#[test]
fn scheduling_without_conflicts_persists_the_candidate() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteBlockRepository::new(&mut conn));

    let candidate = TimeBlock::new("focus", at(9, 0), at(10, 0), Priority::Important);
    let resolution = service.schedule(&candidate).unwrap();

    assert!(resolution.is_unchanged(&candidate));

    let stored = service.get_block(candidate.uuid).unwrap().unwrap();
    assert_eq!(stored.start_ms, at(9, 0));
    assert_eq!(stored.end_ms, at(10, 0));
}

#[test]
fn winning_candidate_persists_displaced_incumbents() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteBlockRepository::new(&mut conn));

    let incumbent = TimeBlock::new("sync", at(14, 30), at(15, 30), Priority::Important);
    service.schedule(&incumbent).unwrap();

    let winner = TimeBlock::new("deep work", at(14, 0), at(15, 0), Priority::UrgentImportant);
    let resolution = service.schedule(&winner).unwrap();

    assert_eq!(resolution.displaced.len(), 1);

    let moved = service.get_block(incumbent.uuid).unwrap().unwrap();
    assert_eq!(moved.start_ms, at(15, 0));
    assert_eq!(moved.end_ms, at(16, 0));

    let placed = service.get_block(winner.uuid).unwrap().unwrap();
    assert_eq!(placed.start_ms, at(14, 0));
    assert_eq!(placed.end_ms, at(15, 0));
}

#[test]
fn yielding_candidate_is_stored_at_its_rescheduled_slot() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteBlockRepository::new(&mut conn));

    let incumbent = TimeBlock::new("call", at(14, 30), at(15, 30), Priority::Urgent);
    service.schedule(&incumbent).unwrap();

    let candidate = TimeBlock::new("errand", at(14, 0), at(15, 0), Priority::Neither);
    let resolution = service.schedule(&candidate).unwrap();

    assert!(resolution.displaced.is_empty());

    let placed = service.get_block(candidate.uuid).unwrap().unwrap();
    assert_eq!(placed.start_ms, at(15, 30));
    assert_eq!(placed.end_ms, at(16, 30));

    let untouched = service.get_block(incumbent.uuid).unwrap().unwrap();
    assert_eq!(untouched.start_ms, at(14, 30));
    assert_eq!(untouched.end_ms, at(15, 30));
}

#[test]
fn rescheduling_an_existing_block_updates_in_place() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteBlockRepository::new(&mut conn));

    let original = TimeBlock::new("planning", at(9, 0), at(10, 0), Priority::Important);
    service.schedule(&original).unwrap();

    // Same block scheduled again at a new slot: one row, new interval.
    let mut moved = original.clone();
    moved.start_ms = at(11, 0);
    moved.end_ms = at(12, 0);
    service.schedule(&moved).unwrap();

    let blocks = service.list_blocks().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].start_ms, at(11, 0));
}

#[test]
fn invalid_candidate_is_rejected_and_nothing_is_written() {
    let mut conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteBlockRepository::new(&mut conn));

    let bad = TimeBlock::new("bad", at(15, 0), at(14, 0), Priority::Urgent);
    let err = service.schedule(&bad).unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    assert!(service.list_blocks().unwrap().is_empty());
}

#[test]
fn export_import_roundtrip_preserves_blocks_and_order() {
    let mut export_conn = open_db_in_memory().unwrap();
    let export_service = CalendarService::new(SqliteBlockRepository::new(&mut export_conn));

    let first = TimeBlock::new("a", at(9, 0), at(10, 0), Priority::Important);
    let second = TimeBlock::new("b", at(11, 0), at(12, 0), Priority::Neither);
    export_service.schedule(&first).unwrap();
    export_service.schedule(&second).unwrap();

    let payload = export_service.export_json().unwrap();

    let mut import_conn = open_db_in_memory().unwrap();
    let mut import_service = CalendarService::new(SqliteBlockRepository::new(&mut import_conn));
    let imported = import_service.import_json(&payload).unwrap();
    assert_eq!(imported, 2);

    let blocks = import_service.list_blocks().unwrap();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].uuid, first.uuid);
    assert_eq!(blocks[1].uuid, second.uuid);
    assert_eq!(blocks[1].title, "b");
}

#[test]
fn imported_hourly_rate_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.db");

    let payload = serde_json::to_string(&CalendarSnapshot {
        time_blocks: vec![TimeBlock::new("a", at(9, 0), at(10, 0), Priority::Important)],
        hourly_rate: 150.0,
    })
    .unwrap();

    {
        let mut conn = open_db(&path).unwrap();
        let mut service = CalendarService::new(SqliteBlockRepository::new(&mut conn));
        assert_eq!(service.hourly_rate().unwrap(), 100.0);
        service.import_json(&payload).unwrap();
    }

    // A fresh service over the same database must still see the rate.
    let mut conn = open_db(&path).unwrap();
    let service = CalendarService::new(SqliteBlockRepository::new(&mut conn));
    assert_eq!(service.hourly_rate().unwrap(), 150.0);

    let exported: CalendarSnapshot =
        serde_json::from_str(&service.export_json().unwrap()).unwrap();
    assert_eq!(exported.hourly_rate, 150.0);
    assert_eq!(exported.time_blocks.len(), 1);
}

#[test]
fn import_rejects_malformed_payloads() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = CalendarService::new(SqliteBlockRepository::new(&mut conn));

    let err = service.import_json("{not json").unwrap_err();
    assert!(matches!(err, ServiceError::Serde(_)));
}

#[test]
fn backup_restore_roundtrip_through_obfuscation() {
    let mut backup_conn = open_db_in_memory().unwrap();
    let backup_service = CalendarService::new(SqliteBlockRepository::new(&mut backup_conn));

    let block = TimeBlock::new("review", at(14, 0), at(15, 0), Priority::UrgentImportant);
    backup_service.schedule(&block).unwrap();

    let payload = backup_service.backup("calendar-key").unwrap();
    assert!(payload.bytes().all(|b| b.is_ascii_hexdigit()));

    let mut restore_conn = open_db_in_memory().unwrap();
    let mut restore_service = CalendarService::new(SqliteBlockRepository::new(&mut restore_conn));
    let restored = restore_service.restore(&payload, "calendar-key").unwrap();
    assert_eq!(restored, 1);

    let loaded = restore_service.get_block(block.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "review");
    assert_eq!(loaded.start_ms, at(14, 0));
}

#[test]
fn restore_with_wrong_key_fails_without_touching_data() {
    let mut source_conn = open_db_in_memory().unwrap();
    let source_service = CalendarService::new(SqliteBlockRepository::new(&mut source_conn));
    source_service
        .schedule(&TimeBlock::new("café plan", at(9, 0), at(10, 0), Priority::Neither))
        .unwrap();
    let payload = source_service.backup("right-key").unwrap();

    let mut target_conn = open_db_in_memory().unwrap();
    let mut target_service = CalendarService::new(SqliteBlockRepository::new(&mut target_conn));
    let keeper = TimeBlock::new("keeper", at(11, 0), at(12, 0), Priority::Urgent);
    target_service.schedule(&keeper).unwrap();

    let err = target_service.restore(&payload, "wrong-kex").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Obfuscation(_) | ServiceError::Serde(_)
    ));

    let blocks = target_service.list_blocks().unwrap();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].uuid, keeper.uuid);
}
