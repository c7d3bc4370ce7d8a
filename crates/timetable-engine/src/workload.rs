//! Teacher workload derivation -- units per teacher from offerings and
//! schedules.
//!
//! The central domain rule: a subject is worth `lecture_units + lab_units`
//! units. Per (offering, course) pair a teacher is credited that figure once
//! as *assignment units* (course coverage), and that figure times the number
//! of weekly contact events as *schedule units* (actual teaching). A subject
//! combined across two courses but taught in one shared event therefore
//! costs fewer schedule units than the same subject taught twice.
//!
//! The result is a materialized [`TeacherWorkload`] view, rebuilt whole and
//! upserted per (teacher, academic year, semester) key. Recomputation is
//! idempotent over unchanged source data.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::error::Result;
use crate::model::{SubjectOffering, SubjectRef, TeacherWorkload, TeachingAssignment};
use crate::store::TimetableStore;

/// Rebuild one teacher's workload view for a term and upsert it.
///
/// Walks every active offering of the term the teacher is assigned to, pairs
/// it with each course it targets, locates the published schedule for that
/// (course, year, semester) slot if any, and derives the unit figures. The
/// assignment list is sorted by (offering id, course id) so recomputation
/// over unchanged data is bit-identical.
///
/// # Errors
/// Returns `TimetableError::NotFound` for an unknown teacher or a dangling
/// subject reference, before anything is written.
pub fn calculate_teacher_workload<S: TimetableStore>(
    store: &mut S,
    teacher_id: &str,
    academic_year: &str,
    semester: u32,
) -> Result<TeacherWorkload> {
    let teacher = store.teacher(teacher_id)?.clone();

    // Offerings for the term this teacher is assigned to, in any reference
    // shape (bare id or populated object).
    let offerings: Vec<_> = store
        .active_offerings(academic_year, semester)
        .into_iter()
        .filter(|o| o.has_teacher(teacher_id))
        .cloned()
        .collect();

    let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
    let mut assignments = Vec::new();

    for offering in &offerings {
        let subject = store.subject(&offering.subject_id)?.clone();
        let subject_units = subject.total_units();

        for course_id in &offering.course_ids {
            // An offering must not be double-counted for the same course.
            if !seen.insert((offering.id.clone(), course_id.clone())) {
                continue;
            }

            // A schedule may not be published yet; assignment units are
            // still credited, schedule units start at zero.
            let event_count = store
                .schedule_for(course_id, offering.year_level, offering.semester)
                .map(|schedule| {
                    schedule
                        .events
                        .iter()
                        .filter(|e| event_realizes_offering(&e.subject, offering))
                        .count() as u32
                })
                .unwrap_or(0);

            assignments.push(TeachingAssignment {
                offering_id: offering.id.clone(),
                course_id: course_id.clone(),
                subject_code: subject.code.clone(),
                subject_name: subject.name.clone(),
                subject_units,
                event_count,
                assignment_units: subject_units,
                schedule_units: subject_units * event_count,
            });
        }
    }

    assignments.sort_by(|a, b| {
        (&a.offering_id, &a.course_id).cmp(&(&b.offering_id, &b.course_id))
    });

    let workload = TeacherWorkload {
        teacher_id: teacher.id.clone(),
        teacher_name: teacher.name.clone(),
        academic_year: academic_year.to_string(),
        semester,
        total_assignment_units: assignments.iter().map(|a| a.assignment_units).sum(),
        total_schedule_units: assignments.iter().map(|a| a.schedule_units).sum(),
        max_unit_limit: teacher.unit_cap(),
        assignments,
    };

    store.upsert_workload(workload.clone())?;
    Ok(workload)
}

/// Whether a schedule event realizes the given offering, whichever way its
/// subject reference points (the offering itself, or the offering's subject).
fn event_realizes_offering(subject_ref: &SubjectRef, offering: &SubjectOffering) -> bool {
    match subject_ref {
        SubjectRef::Offering(id) => *id == offering.id,
        SubjectRef::Subject(id) => *id == offering.subject_id,
    }
}

/// Recompute the workload of every teacher referenced by any active offering
/// of the term.
///
/// Fails fast: the first teacher whose recomputation errors aborts the
/// batch, leaving earlier upserts in place (each per-teacher upsert is
/// atomic, so no view is ever half-written).
pub fn recalculate_all_workloads<S: TimetableStore>(
    store: &mut S,
    academic_year: &str,
    semester: u32,
) -> Result<Vec<TeacherWorkload>> {
    let teacher_ids: BTreeSet<String> = store
        .active_offerings(academic_year, semester)
        .iter()
        .flat_map(|o| o.assigned_teachers.iter())
        .map(|a| a.teacher.id().to_string())
        .collect();

    let mut workloads = Vec::with_capacity(teacher_ids.len());
    for teacher_id in teacher_ids {
        workloads.push(calculate_teacher_workload(
            store,
            &teacher_id,
            academic_year,
            semester,
        )?);
    }
    Ok(workloads)
}

/// Render a human-readable per-assignment breakdown of a workload view.
pub fn render_breakdown(workload: &TeacherWorkload) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Workload for {} -- {} Sem {}",
        workload.teacher_name, workload.academic_year, workload.semester
    );
    if workload.assignments.is_empty() {
        let _ = writeln!(out, "  (no teaching assignments)");
    }
    for a in &workload.assignments {
        let _ = writeln!(
            out,
            "  {} {} [{}]: {} unit(s), {} event(s) -> {} assignment / {} schedule",
            a.subject_code,
            a.subject_name,
            a.course_id,
            a.subject_units,
            a.event_count,
            a.assignment_units,
            a.schedule_units
        );
    }
    let _ = writeln!(
        out,
        "Total assignment units: {}",
        workload.total_assignment_units
    );
    let _ = writeln!(out, "Total schedule units: {}", workload.total_schedule_units);
    let _ = writeln!(out, "Unit cap: {}", workload.max_unit_limit);
    out
}
