use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{PersistenceError, PersistenceResult, SnapshotStore};
use crate::{WeekDay, WeeklySchedule, WorkoutEntry};

/// Snapshot store keeping one `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PersistenceResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(PersistenceError::InvalidData(format!(
                "key '{key}' cannot be used as a file name"
            )));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStore for FileStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        let path = self.path_for(key)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        String::from_utf8(bytes).map(Some).map_err(|err| {
            PersistenceError::Malformed(format!("{} is not valid UTF-8: {err}", path.display()))
        })
    }

    fn write(&self, key: &str, value: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;
        // Write beside the target and rename so readers never see half a snapshot.
        let tmp = path.with_extension("json.tmp");
        if let Err(err) = fs::write(&tmp, value) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "wrote snapshot file");
        Ok(())
    }

    fn remove(&self, key: &str) -> PersistenceResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn ensure_exportable(schedule: &WeeklySchedule) -> PersistenceResult<()> {
    schedule
        .validate()
        .map_err(|err| PersistenceError::InvalidData(err.to_string()))
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &WeeklySchedule,
    path: P,
) -> PersistenceResult<()> {
    ensure_exportable(schedule)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, schedule)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<WeeklySchedule> {
    let file = File::open(path)?;
    let schedule = serde_json::from_reader(file)?;
    Ok(schedule)
}

#[derive(Serialize, Deserialize)]
struct EntryCsvRecord {
    day: String,
    position: String,
    name: String,
    duration: String,
}

impl EntryCsvRecord {
    fn into_parts(self) -> PersistenceResult<(WeekDay, usize, WorkoutEntry)> {
        let day = self
            .day
            .parse::<WeekDay>()
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        let position = self.position.trim().parse::<usize>().map_err(|e| {
            PersistenceError::InvalidData(format!("invalid position '{}': {e}", self.position))
        })?;
        let entry = WorkoutEntry::try_new(self.name, self.duration)
            .map_err(|err| PersistenceError::InvalidData(err.to_string()))?;
        Ok((day, position, entry))
    }
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(
    schedule: &WeeklySchedule,
    path: P,
) -> PersistenceResult<()> {
    ensure_exportable(schedule)?;
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for (day, entries) in schedule.iter() {
        for (position, entry) in entries.iter().enumerate() {
            writer.serialize(EntryCsvRecord {
                day: day.to_string(),
                position: position.to_string(),
                name: entry.name.clone(),
                duration: entry.duration.clone(),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Reads a CSV export. An empty file (header only) yields an empty schedule.
pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<WeeklySchedule> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut rows = Vec::new();
    for record in reader.deserialize::<EntryCsvRecord>() {
        rows.push(record?.into_parts()?);
    }
    rows.sort_by_key(|(day, position, _)| (*day, *position));

    let mut schedule = WeeklySchedule::new();
    for (day, _, entry) in rows {
        schedule.push(day, entry);
    }
    Ok(schedule)
}
