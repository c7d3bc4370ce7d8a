//! Pre-assignment unit-limit check for teachers.
//!
//! Answers "can this subject be added to this teacher's load" before the
//! offering is written. Deliberately uses the plain employment-type cap
//! table (part-time 18, full-time 24) and never the unlimited overload
//! allowance: going over the cap as a full-timer is signalled as
//! `requires_overload`, and granting that is a separate explicit flag flip
//! on the teacher, not something this check does.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::model::EmploymentType;
use crate::store::TimetableStore;

/// Outcome of a unit-limit pre-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitLimitDecision {
    pub valid: bool,
    /// Set when a full-time teacher would exceed the cap and is not yet
    /// overloaded; the caller may re-request after explicit overload
    /// approval.
    pub requires_overload: bool,
    /// Units currently assigned across active offerings of the term.
    pub current_units: u32,
    /// Units after adding the subject (unchanged when it is already
    /// assigned -- the check is idempotent).
    pub projected_units: u32,
    pub unit_cap: u32,
    pub reason: String,
}

/// Decide whether assigning `subject_id` keeps `teacher_id` within the
/// employment-type unit cap for the given term.
///
/// # Errors
/// Returns `TimetableError::NotFound` for an unknown teacher or subject and
/// `TimetableError::InvalidRole` when the user is not a teacher.
pub fn check_unit_limit<S: TimetableStore>(
    store: &S,
    teacher_id: &str,
    subject_id: &str,
    academic_year: &str,
    semester: u32,
) -> Result<UnitLimitDecision> {
    let teacher = store.teacher(teacher_id)?;
    if !teacher.is_teacher() {
        return Err(TimetableError::InvalidRole {
            id: teacher.id.clone(),
            role: teacher.role.clone(),
        });
    }
    let subject = store.subject(subject_id)?;
    let cap = teacher.employment_type.base_cap();

    let mut current_units = 0;
    let mut already_assigned = false;
    for offering in store.active_offerings(academic_year, semester) {
        if !offering.has_teacher(teacher_id) {
            continue;
        }
        current_units += store.subject(&offering.subject_id)?.total_units();
        if offering.subject_id == subject.id {
            already_assigned = true;
        }
    }

    let projected_units = if already_assigned {
        current_units
    } else {
        current_units + subject.total_units()
    };

    let decision = if projected_units <= cap {
        UnitLimitDecision {
            valid: true,
            requires_overload: false,
            current_units,
            projected_units,
            unit_cap: cap,
            reason: format!(
                "{} would be at {} of {} unit(s)",
                teacher.name, projected_units, cap
            ),
        }
    } else {
        match teacher.employment_type {
            EmploymentType::PartTime => UnitLimitDecision {
                valid: false,
                requires_overload: false,
                current_units,
                projected_units,
                unit_cap: cap,
                reason: format!(
                    "{} is part-time and {} unit(s) would exceed the {}-unit cap",
                    teacher.name, projected_units, cap
                ),
            },
            EmploymentType::FullTime if teacher.is_overloaded => UnitLimitDecision {
                valid: true,
                requires_overload: false,
                current_units,
                projected_units,
                unit_cap: cap,
                reason: format!(
                    "{} is overloaded; the {}-unit cap is not enforced",
                    teacher.name, cap
                ),
            },
            EmploymentType::FullTime => UnitLimitDecision {
                valid: false,
                requires_overload: true,
                current_units,
                projected_units,
                unit_cap: cap,
                reason: format!(
                    "{} unit(s) would exceed the {}-unit cap; overload approval required",
                    projected_units, cap
                ),
            },
        }
    };
    Ok(decision)
}
