//! Curricular hours validation for candidate schedule events.
//!
//! Scheduled hours are summed per (subject, session type) and compared with
//! the subject's weekly requirement. Over-scheduling is rejected;
//! under-scheduling is accepted -- a schedule may be built up across several
//! edits before it covers the full requirement.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::clock;
use crate::error::Result;
use crate::model::{ScheduleEvent, SessionType, Subject};
use crate::store::SubjectResolver;

/// A (subject, session type) group that breaks the curricular requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursViolation {
    pub subject_id: String,
    pub subject_code: String,
    pub subject_name: String,
    pub session_type: SessionType,
    pub scheduled_hours: f64,
    pub required_hours: f64,
    /// `scheduled - required`; for a lab scheduled against a no-lab subject
    /// this is the whole scheduled amount.
    pub excess_hours: f64,
    pub message: String,
}

/// Validate candidate events against each subject's weekly hour requirement.
///
/// Events are grouped by (resolved subject, session type); offerings proxy
/// their subject through `resolver`. Per group:
///
/// - a `lab` group for a subject without lab units violates unconditionally;
/// - otherwise the group violates when scheduled hours exceed the
///   requirement (equality passes).
///
/// A non-empty result must reject the whole schedule write.
///
/// # Errors
/// Returns `TimetableError::InvalidTime` for malformed event times and
/// `TimetableError::NotFound` when a subject reference does not resolve.
pub fn validate_hours(
    events: &[ScheduleEvent],
    resolver: &impl SubjectResolver,
) -> Result<Vec<HoursViolation>> {
    // Accumulate hours per (subject id, session type); keep each resolved
    // subject around for reporting.
    let mut scheduled: BTreeMap<(String, SessionType), f64> = BTreeMap::new();
    let mut subjects: BTreeMap<String, Subject> = BTreeMap::new();

    for event in events {
        let subject = resolver.resolve_subject(&event.subject)?;
        let (start, end) = event.minutes()?;
        let hours = clock::span_hours(start, end);
        *scheduled
            .entry((subject.id.clone(), event.session_type))
            .or_insert(0.0) += hours;
        subjects
            .entry(subject.id.clone())
            .or_insert_with(|| subject.clone());
    }

    let mut violations = Vec::new();
    for ((subject_id, session_type), hours) in scheduled {
        let subject = &subjects[&subject_id];
        match subject.requirement_for(session_type) {
            None => violations.push(HoursViolation {
                subject_id,
                subject_code: subject.code.clone(),
                subject_name: subject.name.clone(),
                session_type,
                scheduled_hours: hours,
                required_hours: 0.0,
                excess_hours: hours,
                message: format!(
                    "{} has no lab component but has {:.1} lab hour(s) scheduled",
                    subject.code, hours
                ),
            }),
            Some(req) if hours > req.required_hours + 1e-9 => {
                violations.push(HoursViolation {
                    subject_id,
                    subject_code: subject.code.clone(),
                    subject_name: subject.name.clone(),
                    session_type,
                    scheduled_hours: hours,
                    required_hours: req.required_hours,
                    excess_hours: hours - req.required_hours,
                    message: format!(
                        "{} {} is over-scheduled: {:.1} of {:.1} required hour(s), {:.1} in excess",
                        subject.code,
                        session_type,
                        hours,
                        req.required_hours,
                        hours - req.required_hours
                    ),
                });
            }
            Some(_) => {}
        }
    }
    Ok(violations)
}
