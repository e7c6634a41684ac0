pub mod catalog;
pub mod config;
pub mod dragdrop;
pub mod entry;
pub mod error;
pub mod persistence;
pub mod schedule;
pub mod store;
pub mod template;
pub mod weekday;

pub use catalog::{Catalog, Category, CategoryFilter, WorkoutDefinition};
pub use config::{BackendKind, ConfigError, PlannerConfig, StorageConfig};
pub use dragdrop::{DragEffect, DragEvent, DragMachine, DragPayload, DragState};
pub use entry::WorkoutEntry;
pub use error::{PlannerError, PlannerResult};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteStore;
pub use persistence::{
    FileStore, MemoryStore, PersistenceError, PersistenceResult, SnapshotStore,
    load_schedule_from_csv, load_schedule_from_json, save_schedule_to_csv, save_schedule_to_json,
};
pub use schedule::WeeklySchedule;
pub use store::{
    Answer, ConfirmationGate, DEFAULT_SNAPSHOT_KEY, LoadOutcome, Placement, WeeklyScheduleStore,
};
pub use template::TemplateLevel;
pub use weekday::WeekDay;
