//! Drag-and-drop interaction between the workout catalog and the day targets.
//!
//! The machine only tracks what is being dragged and which day is highlighted.
//! Committing a drop into the schedule is left to
//! [`WeeklyScheduleStore::dispatch_drag`](crate::store::WeeklyScheduleStore::dispatch_drag).

use serde::{Deserialize, Serialize};

use crate::entry::WorkoutEntry;
use crate::error::{PlannerError, PlannerResult};
use crate::persistence::PersistenceError;
use crate::weekday::WeekDay;

/// Data carried with a drag, encoded as JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragPayload {
    pub name: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl DragPayload {
    pub fn decode(text: &str) -> PlannerResult<WorkoutEntry> {
        let payload: DragPayload = serde_json::from_str(text)
            .map_err(|err| PlannerError::InvalidEntry(format!("malformed drag payload: {err}")))?;
        WorkoutEntry::try_new(payload.name, payload.duration)
    }

    pub fn encode(entry: &WorkoutEntry, color: Option<&str>) -> PlannerResult<String> {
        let payload = DragPayload {
            name: entry.name.clone(),
            duration: entry.duration.clone(),
            color: color.map(str::to_string),
        };
        let text = serde_json::to_string(&payload).map_err(PersistenceError::from)?;
        Ok(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        payload: WorkoutEntry,
    },
    OverTarget {
        payload: WorkoutEntry,
        day: WeekDay,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start(WorkoutEntry),
    Enter(WeekDay),
    Leave,
    Drop,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    MarkTarget(WeekDay),
    UnmarkTarget(WeekDay),
    Commit { day: WeekDay, entry: WorkoutEntry },
}

#[derive(Debug, Default)]
pub struct DragMachine {
    state: DragState,
}

impl DragMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    /// Applies `event` and returns the effects the renderer and store must carry out.
    pub fn handle(&mut self, event: DragEvent) -> Vec<DragEffect> {
        let current = std::mem::take(&mut self.state);
        let (next, effects) = transition(current, event);
        self.state = next;
        effects
    }
}

fn transition(state: DragState, event: DragEvent) -> (DragState, Vec<DragEffect>) {
    match (state, event) {
        (DragState::Idle, DragEvent::Start(payload)) => {
            (DragState::Dragging { payload }, Vec::new())
        }
        (DragState::Dragging { payload }, DragEvent::Enter(day)) => (
            DragState::OverTarget { payload, day },
            vec![DragEffect::MarkTarget(day)],
        ),
        (DragState::OverTarget { payload, day }, DragEvent::Enter(next)) if next != day => (
            DragState::OverTarget { payload, day: next },
            vec![DragEffect::UnmarkTarget(day), DragEffect::MarkTarget(next)],
        ),
        (DragState::OverTarget { payload, day }, DragEvent::Leave) => (
            DragState::Dragging { payload },
            vec![DragEffect::UnmarkTarget(day)],
        ),
        (DragState::OverTarget { payload, day }, DragEvent::Drop) => (
            DragState::Idle,
            vec![
                DragEffect::UnmarkTarget(day),
                DragEffect::Commit {
                    day,
                    entry: payload,
                },
            ],
        ),
        (DragState::Dragging { .. }, DragEvent::Drop | DragEvent::End) => {
            (DragState::Idle, Vec::new())
        }
        (DragState::OverTarget { day, .. }, DragEvent::End) => {
            (DragState::Idle, vec![DragEffect::UnmarkTarget(day)])
        }
        (state, event) => {
            tracing::debug!(?state, ?event, "ignoring drag event");
            (state, Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> WorkoutEntry {
        WorkoutEntry::new("Running", "30 min • Cardio")
    }

    fn dragging_over(day: WeekDay) -> DragMachine {
        let mut machine = DragMachine::new();
        machine.handle(DragEvent::Start(running()));
        machine.handle(DragEvent::Enter(day));
        machine
    }

    #[test]
    fn start_carries_payload() {
        let mut machine = DragMachine::new();
        let effects = machine.handle(DragEvent::Start(running()));
        assert!(effects.is_empty());
        assert_eq!(
            machine.state(),
            &DragState::Dragging { payload: running() }
        );
    }

    #[test]
    fn entering_a_day_marks_it() {
        let mut machine = DragMachine::new();
        machine.handle(DragEvent::Start(running()));
        let effects = machine.handle(DragEvent::Enter(WeekDay::Friday));
        assert_eq!(effects, vec![DragEffect::MarkTarget(WeekDay::Friday)]);
    }

    #[test]
    fn moving_between_days_moves_the_mark() {
        let mut machine = dragging_over(WeekDay::Monday);
        let effects = machine.handle(DragEvent::Enter(WeekDay::Tuesday));
        assert_eq!(
            effects,
            vec![
                DragEffect::UnmarkTarget(WeekDay::Monday),
                DragEffect::MarkTarget(WeekDay::Tuesday)
            ]
        );
        assert!(machine.handle(DragEvent::Enter(WeekDay::Tuesday)).is_empty());
    }

    #[test]
    fn drop_over_target_commits_and_returns_to_idle() {
        let mut machine = dragging_over(WeekDay::Friday);
        let effects = machine.handle(DragEvent::Drop);
        assert_eq!(
            effects,
            vec![
                DragEffect::UnmarkTarget(WeekDay::Friday),
                DragEffect::Commit {
                    day: WeekDay::Friday,
                    entry: running()
                }
            ]
        );
        assert!(machine.is_idle());
    }

    #[test]
    fn leaving_then_dropping_outside_has_no_effect() {
        let mut machine = dragging_over(WeekDay::Friday);
        assert_eq!(
            machine.handle(DragEvent::Leave),
            vec![DragEffect::UnmarkTarget(WeekDay::Friday)]
        );
        assert!(machine.handle(DragEvent::Drop).is_empty());
        assert!(machine.is_idle());
    }

    #[test]
    fn ending_over_target_clears_mark() {
        let mut machine = dragging_over(WeekDay::Sunday);
        assert_eq!(
            machine.handle(DragEvent::End),
            vec![DragEffect::UnmarkTarget(WeekDay::Sunday)]
        );
        assert!(machine.is_idle());
    }

    #[test]
    fn events_without_a_drag_are_ignored() {
        let mut machine = DragMachine::new();
        for event in [
            DragEvent::Enter(WeekDay::Monday),
            DragEvent::Leave,
            DragEvent::Drop,
            DragEvent::End,
        ] {
            assert!(machine.handle(event).is_empty());
            assert!(machine.is_idle());
        }
    }

    #[test]
    fn second_start_while_dragging_is_ignored() {
        let mut machine = dragging_over(WeekDay::Monday);
        let yoga = WorkoutEntry::new("Yoga", "60 min • Flexibility");
        assert!(machine.handle(DragEvent::Start(yoga)).is_empty());
        assert_eq!(
            machine.state(),
            &DragState::OverTarget {
                payload: running(),
                day: WeekDay::Monday
            }
        );
    }

    #[test]
    fn payload_codec_ignores_color_and_validates_name() {
        let entry = DragPayload::decode(
            r#"{"name":"Running","duration":"30 min • Cardio","color":"linear-gradient(red, blue)"}"#,
        )
        .unwrap();
        assert_eq!(entry, running());

        let encoded = DragPayload::encode(&entry, None).unwrap();
        assert_eq!(DragPayload::decode(&encoded).unwrap(), entry);

        let tinted = DragPayload::encode(&entry, Some("rgb(239, 68, 68)")).unwrap();
        assert!(tinted.contains(r#""color":"rgb(239, 68, 68)""#), "{tinted}");
        assert_eq!(DragPayload::decode(&tinted).unwrap(), entry);

        assert!(DragPayload::decode("not json").is_err());
        assert!(DragPayload::decode(r#"{"name":"","duration":"x"}"#).is_err());
    }
}
