//! Schedule-write gate -- every mutation runs all three validators against
//! one consistent snapshot, and persists only when all of them come back
//! empty.

use serde::{Deserialize, Serialize};

use crate::conflict::{self, CrossConflict, InternalConflict};
use crate::error::Result;
use crate::hours::{self, HoursViolation};
use crate::model::Schedule;
use crate::store::TimetableStore;

/// Combined findings of the three schedule validators. The write may proceed
/// only when [`ScheduleValidation::is_clean`] holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleValidation {
    pub internal_conflicts: Vec<InternalConflict>,
    pub cross_conflicts: Vec<CrossConflict>,
    pub hours_violations: Vec<HoursViolation>,
}

impl ScheduleValidation {
    pub fn is_clean(&self) -> bool {
        self.internal_conflicts.is_empty()
            && self.cross_conflicts.is_empty()
            && self.hours_violations.is_empty()
    }

    /// All finding messages, in validator order, for display.
    pub fn messages(&self) -> Vec<&str> {
        self.internal_conflicts
            .iter()
            .map(|c| c.message.as_str())
            .chain(self.cross_conflicts.iter().map(|c| c.message.as_str()))
            .chain(self.hours_violations.iter().map(|v| v.message.as_str()))
            .collect()
    }
}

/// Run the intra-schedule, cross-schedule and hours validators for a
/// candidate schedule write.
///
/// The candidate's own stored version is excluded from the cross check, so
/// an update never conflicts with itself.
///
/// # Errors
/// Returns `TimetableError::InvalidTime` for malformed event times and
/// `TimetableError::NotFound` for dangling subject references; findings are
/// not errors.
pub fn validate_schedule_write<S: TimetableStore>(
    store: &S,
    schedule: &Schedule,
) -> Result<ScheduleValidation> {
    let internal_conflicts = conflict::find_internal_conflicts(&schedule.events)?;

    let others: Vec<_> = store
        .active_schedules()
        .into_iter()
        .filter(|s| s.id != schedule.id)
        .collect();
    let cross_conflicts =
        conflict::find_cross_conflicts(&schedule.events, &others, &schedule.context())?;

    let hours_violations = hours::validate_hours(&schedule.events, store)?;

    Ok(ScheduleValidation {
        internal_conflicts,
        cross_conflicts,
        hours_violations,
    })
}
