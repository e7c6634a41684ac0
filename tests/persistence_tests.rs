use std::fs;
use tempfile::{NamedTempFile, tempdir};
use workout_planner::{
    FileStore, PersistenceError, SnapshotStore, TemplateLevel, WeekDay, WeeklySchedule,
    WeeklyScheduleStore, WorkoutEntry, load_schedule_from_csv, load_schedule_from_json,
    save_schedule_to_csv, save_schedule_to_json,
};

fn build_sample_schedule() -> WeeklySchedule {
    let mut schedule = TemplateLevel::Intermediate.schedule();
    schedule.push(WeekDay::Monday, WorkoutEntry::new("Running", "30 min • Cardio"));
    schedule.push(WeekDay::Saturday, WorkoutEntry::new("Yoga, then sauna", "60 min • Flexibility"));
    schedule
}

#[test]
fn file_store_round_trip_and_remove() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path().join("nested"));

    assert_eq!(store.read("weeklySchedule").unwrap(), None);
    store.write("weeklySchedule", "{}").unwrap();
    assert_eq!(store.read("weeklySchedule").unwrap().as_deref(), Some("{}"));
    assert!(dir.path().join("nested").join("weeklySchedule.json").exists());

    store.remove("weeklySchedule").unwrap();
    assert_eq!(store.read("weeklySchedule").unwrap(), None);
    store.remove("weeklySchedule").unwrap();
}

#[test]
fn file_store_rejects_path_like_keys() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path());
    assert!(matches!(
        store.write("../escape", "{}"),
        Err(PersistenceError::InvalidData(_))
    ));
    assert!(store.read("").is_err());
}

#[test]
fn file_backed_store_survives_restart() {
    let dir = tempdir().unwrap();
    let schedule = build_sample_schedule();

    let mut first = WeeklyScheduleStore::new(FileStore::new(dir.path()));
    first.replace(schedule.clone());
    first.persist().unwrap();

    let second = WeeklyScheduleStore::open(FileStore::new(dir.path()), "weeklySchedule");
    assert_eq!(second.schedule(), &schedule);
}

#[test]
fn truncated_file_snapshot_is_corrupt() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("weeklySchedule.json"), r#"{"monday":[{"name":"Chest"#).unwrap();

    let mut store = WeeklyScheduleStore::new(FileStore::new(dir.path()));
    assert!(matches!(
        store.load(),
        Err(workout_planner::PlannerError::CorruptState { .. })
    ));
    assert!(store.is_empty());
}

#[test]
fn non_utf8_snapshot_file_is_corrupt() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("weeklySchedule.json"), [0xff, 0xfe, 0x7b]).unwrap();

    assert!(matches!(
        FileStore::new(dir.path()).read("weeklySchedule"),
        Err(PersistenceError::Malformed(_))
    ));

    let mut store = WeeklyScheduleStore::new(FileStore::new(dir.path()));
    store.add_entry(WeekDay::Monday, WorkoutEntry::new("Running", "30 min • Cardio"));
    assert!(matches!(
        store.load(),
        Err(workout_planner::PlannerError::CorruptState { .. })
    ));
    assert_eq!(store.entries(WeekDay::Monday).len(), 1);

    let opened = WeeklyScheduleStore::open(FileStore::new(dir.path()), "weeklySchedule");
    assert!(opened.is_empty());
}

#[test]
fn export_refuses_blank_workout_names() {
    let mut schedule = build_sample_schedule();
    schedule.push(WeekDay::Tuesday, WorkoutEntry::new("", "30 min • Cardio"));
    let file = NamedTempFile::new().unwrap();

    assert!(matches!(
        save_schedule_to_json(&schedule, file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
    assert!(matches!(
        save_schedule_to_csv(&schedule, file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn json_export_round_trip_preserves_schedule() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_json(&schedule, file.path()).unwrap();
    let loaded = load_schedule_from_json(file.path()).unwrap();
    assert_eq!(loaded, schedule);
}

#[test]
fn csv_export_round_trip_preserves_order() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_csv(&schedule, file.path()).unwrap();
    let loaded = load_schedule_from_csv(file.path()).unwrap();
    assert_eq!(loaded, schedule);
    assert_eq!(loaded.entries(WeekDay::Monday)[1].name, "Running");
}

#[test]
fn csv_rows_are_ordered_by_day_and_position() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "day,position,name,duration\n\
         friday,1,Yoga,60 min • Flexibility\n\
         monday,0,Chest Day,60 min • Strength\n\
         friday,0,Running,30 min • Cardio\n",
    )
    .unwrap();

    let loaded = load_schedule_from_csv(file.path()).unwrap();
    let friday: Vec<_> = loaded
        .entries(WeekDay::Friday)
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(friday, vec!["Running", "Yoga"]);
    assert_eq!(loaded.entries(WeekDay::Monday).len(), 1);
}

#[test]
fn csv_with_unknown_day_is_invalid() {
    let file = NamedTempFile::new().unwrap();
    fs::write(
        file.path(),
        "day,position,name,duration\nfunday,0,Running,30 min • Cardio\n",
    )
    .unwrap();

    assert!(matches!(
        load_schedule_from_csv(file.path()),
        Err(PersistenceError::InvalidData(_))
    ));
}

#[test]
fn empty_schedule_exports_to_empty_csv() {
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_csv(&WeeklySchedule::new(), file.path()).unwrap();
    assert!(load_schedule_from_csv(file.path()).unwrap().is_empty());
}
