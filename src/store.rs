use crate::dragdrop::{DragEffect, DragEvent, DragMachine};
use crate::entry::WorkoutEntry;
use crate::error::{PlannerError, PlannerResult};
use crate::persistence::{PersistenceError, SnapshotStore};
use crate::schedule::WeeklySchedule;
use crate::template::TemplateLevel;
use crate::weekday::WeekDay;

pub const DEFAULT_SNAPSHOT_KEY: &str = "weeklySchedule";

pub const CLEAR_PROMPT: &str = "Are you sure you want to clear your entire schedule?";

/// Synchronous yes/no prompt guarding destructive operations.
pub trait ConfirmationGate {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Fixed answer, for callers that already asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl ConfirmationGate for Answer {
    fn confirm(&mut self, _prompt: &str) -> bool {
        *self == Answer::Yes
    }
}

impl<F: FnMut(&str) -> bool> ConfirmationGate for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Where an added entry landed, for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub day: WeekDay,
    pub index: usize,
    /// The day was empty before, so its placeholder must go.
    pub replaced_placeholder: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Absent,
}

/// Owner of the weekly schedule and its persisted snapshot.
pub struct WeeklyScheduleStore {
    schedule: WeeklySchedule,
    backend: Box<dyn SnapshotStore>,
    key: String,
}

impl WeeklyScheduleStore {
    pub fn new(backend: impl SnapshotStore + 'static) -> Self {
        Self::with_key(backend, DEFAULT_SNAPSHOT_KEY)
    }

    pub fn with_key(backend: impl SnapshotStore + 'static, key: impl Into<String>) -> Self {
        Self {
            schedule: WeeklySchedule::new(),
            backend: Box::new(backend),
            key: key.into(),
        }
    }

    /// Creates a store and restores the saved snapshot.
    ///
    /// Startup never fails: an unreadable or corrupt snapshot is logged and the
    /// store starts empty.
    pub fn open(backend: impl SnapshotStore + 'static, key: impl Into<String>) -> Self {
        let mut store = Self::with_key(backend, key);
        match store.load() {
            Ok(LoadOutcome::Loaded) => {}
            Ok(LoadOutcome::Absent) => {
                tracing::debug!(key = %store.key, "no saved schedule, starting empty");
            }
            Err(err) => {
                tracing::warn!(error = %err, "error loading schedule, starting empty");
            }
        }
        store
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn entries(&self, day: WeekDay) -> &[WorkoutEntry] {
        self.schedule.entries(day)
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn add_entry(&mut self, day: WeekDay, entry: WorkoutEntry) -> Placement {
        let replaced_placeholder = self.schedule.is_day_empty(day);
        tracing::debug!(%day, name = %entry.name, "adding workout");
        let index = self.schedule.push(day, entry);
        Placement {
            day,
            index,
            replaced_placeholder,
        }
    }

    /// Removes the first entry on `day` named `name`; `None` when nothing matched.
    pub fn remove_entry(&mut self, day: WeekDay, name: &str) -> Option<WorkoutEntry> {
        let removed = self.schedule.remove_first(day, name);
        match &removed {
            Some(_) => tracing::debug!(%day, name, "removed workout"),
            None => tracing::debug!(%day, name, "no workout to remove"),
        }
        removed
    }

    /// Empties every day and discards the snapshot once `gate` agrees.
    ///
    /// Returns `Ok(false)` when the user declined.
    pub fn clear_all(&mut self, gate: &mut impl ConfirmationGate) -> PlannerResult<bool> {
        if !gate.confirm(CLEAR_PROMPT) {
            tracing::debug!("clear declined");
            return Ok(false);
        }
        self.reset()?;
        tracing::info!("schedule cleared");
        Ok(true)
    }

    pub fn load_template(&mut self, level: TemplateLevel) -> PlannerResult<()> {
        self.reset()?;
        for (day, entry) in level.entries() {
            self.add_entry(day, entry);
        }
        tracing::info!(template = %level, entries = self.schedule.total_entries(), "template loaded");
        Ok(())
    }

    pub fn load_template_named(&mut self, level: &str) -> PlannerResult<TemplateLevel> {
        let level = level.parse::<TemplateLevel>()?;
        self.load_template(level)?;
        Ok(level)
    }

    /// Writes the whole schedule under the snapshot key.
    ///
    /// A schedule holding an entry that could not be read back is rejected
    /// with [`PlannerError::InvalidEntry`] and nothing is written.
    pub fn persist(&self) -> PlannerResult<()> {
        self.schedule.validate()?;
        let json = self
            .schedule
            .to_json()
            .map_err(PersistenceError::from)?;
        self.backend.write(&self.key, &json)?;
        tracing::info!(key = %self.key, entries = self.schedule.total_entries(), "schedule saved");
        Ok(())
    }

    /// Replaces the schedule with the saved snapshot, if there is one.
    ///
    /// A malformed snapshot is reported as [`PlannerError::CorruptState`] and
    /// leaves the current schedule untouched.
    pub fn load(&mut self) -> PlannerResult<LoadOutcome> {
        let json = match self.backend.read(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => return Ok(LoadOutcome::Absent),
            Err(PersistenceError::Malformed(reason)) => return Err(self.corrupt(reason)),
            Err(err) => return Err(err.into()),
        };
        let schedule =
            WeeklySchedule::from_json(&json).map_err(|err| self.corrupt(err.to_string()))?;
        self.schedule = schedule;
        tracing::info!(key = %self.key, entries = self.schedule.total_entries(), "schedule loaded");
        Ok(LoadOutcome::Loaded)
    }

    /// Swaps in a schedule built elsewhere, e.g. an imported file.
    pub fn replace(&mut self, schedule: WeeklySchedule) {
        self.schedule = schedule;
    }

    /// Feeds `event` to `machine` and adds any dropped workout to the schedule.
    pub fn dispatch_drag(&mut self, machine: &mut DragMachine, event: DragEvent) -> Vec<DragEffect> {
        let effects = machine.handle(event);
        for effect in &effects {
            if let DragEffect::Commit { day, entry } = effect {
                self.add_entry(*day, entry.clone());
            }
        }
        effects
    }

    fn corrupt(&self, reason: String) -> PlannerError {
        tracing::warn!(key = %self.key, error = %reason, "stored schedule is corrupt");
        PlannerError::CorruptState {
            key: self.key.clone(),
            reason,
        }
    }

    fn reset(&mut self) -> PlannerResult<()> {
        self.backend.remove(&self.key)?;
        self.schedule.clear();
        Ok(())
    }
}
