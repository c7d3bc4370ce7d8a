//! Conflict detection for candidate schedule events.
//!
//! Two checkers share the same half-open overlap semantics from [`clock`]:
//! adjacent events (one ends exactly when another starts) are never
//! conflicts.
//!
//! - [`find_internal_conflicts`] -- pairwise overlaps *within* one candidate
//!   event set.
//! - [`find_cross_conflicts`] -- overlaps between a candidate set and every
//!   other active schedule, classified as student / teacher / room.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock;
use crate::error::Result;
use crate::model::{Schedule, ScheduleContext, ScheduleEvent};

/// A time overlap between two events of the same candidate schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InternalConflict {
    pub first: ScheduleEvent,
    pub second: ScheduleEvent,
    pub message: String,
}

/// Find all pairwise same-day overlaps within one candidate event set.
///
/// O(n²) over the event count, which stays small (a schedule holds one
/// term's weekly sessions). A non-empty result must reject the whole
/// schedule write.
///
/// # Errors
/// Returns `TimetableError::InvalidTime` when any event carries a malformed
/// or inverted time window.
pub fn find_internal_conflicts(events: &[ScheduleEvent]) -> Result<Vec<InternalConflict>> {
    let windows = events
        .iter()
        .map(|e| e.minutes())
        .collect::<Result<Vec<_>>>()?;

    let mut conflicts = Vec::new();
    for i in 0..events.len() {
        for j in (i + 1)..events.len() {
            let (a, b) = (&events[i], &events[j]);
            if a.day != b.day {
                continue;
            }
            let (a_start, a_end) = windows[i];
            let (b_start, b_end) = windows[j];
            if clock::overlaps(a_start, a_end, b_start, b_end) {
                conflicts.push(InternalConflict {
                    first: a.clone(),
                    second: b.clone(),
                    message: format!(
                        "Events {} and {} overlap within the same schedule",
                        a.window(),
                        b.window()
                    ),
                });
            }
        }
    }
    Ok(conflicts)
}

/// Why an existing event blocks a candidate event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    /// Same (course, year, semester, academic year): one student body,
    /// two places at once.
    Student,
    /// Same teacher double-booked anywhere within the same academic year.
    Teacher,
    /// Same room double-booked anywhere within the same academic year.
    Room,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::Student => f.write_str("student"),
            ConflictKind::Teacher => f.write_str("teacher"),
            ConflictKind::Room => f.write_str("room"),
        }
    }
}

/// One classified overlap between a candidate event and an event of another
/// active schedule. Carries enough structure to render a UI message without
/// re-deriving anything.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossConflict {
    pub kind: ConflictKind,
    /// Display name of the schedule the existing event belongs to.
    pub schedule_label: String,
    /// Time window of the existing event, e.g. "Monday 09:00-10:00".
    pub existing_window: String,
    /// Time window of the candidate event.
    pub candidate_window: String,
    /// Teacher display name (or id), for teacher conflicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_name: Option<String>,
    /// Room identifier as written on the candidate, for room conflicts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    pub message: String,
}

/// Check a candidate event set against every other active schedule.
///
/// For each (existing event, candidate event) pair on the same day with
/// overlapping windows, up to three conflict records are emitted -- one per
/// matching class:
///
/// - **student**: the existing schedule's context tuple equals `context`
///   exactly.
/// - **teacher**: both events name the same teacher id and the schedules
///   share an academic year. Unassigned slots never conflict.
/// - **room**: both events name the same room (trimmed, case-insensitive)
///   and the schedules share an academic year. Blank rooms never conflict.
///
/// When updating an existing schedule, the caller must exclude that
/// schedule from `others` first, or it would always conflict with itself.
///
/// # Errors
/// Returns `TimetableError::InvalidTime` when any event on either side
/// carries a malformed or inverted time window.
pub fn find_cross_conflicts(
    candidate: &[ScheduleEvent],
    others: &[&Schedule],
    context: &ScheduleContext,
) -> Result<Vec<CrossConflict>> {
    let candidate_windows = candidate
        .iter()
        .map(|e| e.minutes())
        .collect::<Result<Vec<_>>>()?;

    let mut conflicts = Vec::new();
    for schedule in others {
        let same_context = schedule.context() == *context;
        let same_year = schedule.academic_year == context.academic_year;

        for existing in &schedule.events {
            let (ex_start, ex_end) = existing.minutes()?;
            for (cand, &(c_start, c_end)) in candidate.iter().zip(&candidate_windows) {
                if cand.day != existing.day
                    || !clock::overlaps(ex_start, ex_end, c_start, c_end)
                {
                    continue;
                }

                if same_context {
                    conflicts.push(student_conflict(schedule, existing, cand));
                }
                if same_year {
                    if let Some(conflict) = teacher_conflict(schedule, existing, cand) {
                        conflicts.push(conflict);
                    }
                    if let Some(conflict) = room_conflict(schedule, existing, cand) {
                        conflicts.push(conflict);
                    }
                }
            }
        }
    }
    Ok(conflicts)
}

fn student_conflict(
    schedule: &Schedule,
    existing: &ScheduleEvent,
    candidate: &ScheduleEvent,
) -> CrossConflict {
    CrossConflict {
        kind: ConflictKind::Student,
        schedule_label: schedule.label(),
        existing_window: existing.window(),
        candidate_window: candidate.window(),
        teacher_name: None,
        room: None,
        message: format!(
            "Students of {} already have a class {} overlapping {}",
            schedule.label(),
            existing.window(),
            candidate.window()
        ),
    }
}

fn teacher_conflict(
    schedule: &Schedule,
    existing: &ScheduleEvent,
    candidate: &ScheduleEvent,
) -> Option<CrossConflict> {
    let existing_teacher = existing.teacher.as_ref()?;
    let candidate_teacher = candidate.teacher.as_ref()?;
    if !candidate_teacher.same_as(existing_teacher.id()) {
        return None;
    }
    let name = candidate_teacher
        .name()
        .or_else(|| existing_teacher.name())
        .unwrap_or_else(|| candidate_teacher.id())
        .to_string();
    Some(CrossConflict {
        kind: ConflictKind::Teacher,
        schedule_label: schedule.label(),
        existing_window: existing.window(),
        candidate_window: candidate.window(),
        teacher_name: Some(name.clone()),
        room: None,
        message: format!(
            "Teacher {} is already teaching {} {} overlapping {}",
            name,
            schedule.label(),
            existing.window(),
            candidate.window()
        ),
    })
}

fn room_conflict(
    schedule: &Schedule,
    existing: &ScheduleEvent,
    candidate: &ScheduleEvent,
) -> Option<CrossConflict> {
    let existing_room = existing.room_key()?;
    let candidate_room = candidate.room_key()?;
    if existing_room != candidate_room {
        return None;
    }
    // Report the room as the candidate wrote it, not the normalized key.
    let display = candidate
        .room
        .as_deref()
        .map(str::trim)
        .unwrap_or(&candidate_room)
        .to_string();
    Some(CrossConflict {
        kind: ConflictKind::Room,
        schedule_label: schedule.label(),
        existing_window: existing.window(),
        candidate_window: candidate.window(),
        teacher_name: None,
        room: Some(display.clone()),
        message: format!(
            "Room {} is already occupied by {} {} overlapping {}",
            display,
            schedule.label(),
            existing.window(),
            candidate.window()
        ),
    })
}
