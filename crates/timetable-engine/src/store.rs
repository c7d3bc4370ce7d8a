//! Storage seam -- the trait the engine reads through, plus an in-memory
//! reference implementation.
//!
//! The engine never talks to a database directly; request handlers hand it
//! something implementing [`TimetableStore`]. [`MemoryStore`] is the
//! implementation used by the CLI and the test suites, loaded from a serde
//! [`Dataset`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{Result, TimetableError};
use crate::model::{
    Course, Schedule, Subject, SubjectOffering, SubjectRef, Teacher, TeacherWorkload,
};
use crate::validate::{self, ScheduleValidation};

/// Resolve a reference that may denote a subject or an offering to the
/// underlying [`Subject`]. Offerings proxy their subject for hours and unit
/// purposes.
pub trait SubjectResolver {
    fn resolve_subject(&self, subject_ref: &SubjectRef) -> Result<&Subject>;
}

/// Read access to the persisted timetable world, plus the one write the
/// engine itself performs: replacing a teacher's materialized workload view.
pub trait TimetableStore: SubjectResolver {
    fn subject(&self, id: &str) -> Result<&Subject>;
    fn course(&self, id: &str) -> Result<&Course>;
    fn teacher(&self, id: &str) -> Result<&Teacher>;

    /// Active offerings for one term.
    fn active_offerings(&self, academic_year: &str, semester: u32) -> Vec<&SubjectOffering>;

    /// All active schedules, each carrying its own events and context.
    fn active_schedules(&self) -> Vec<&Schedule>;

    /// The active schedule for a (course, year level, semester) slot, if one
    /// has been published.
    fn schedule_for(&self, course_id: &str, year_level: u32, semester: u32) -> Option<&Schedule>;

    fn workload(
        &self,
        teacher_id: &str,
        academic_year: &str,
        semester: u32,
    ) -> Option<&TeacherWorkload>;

    /// Replace the workload view for its (teacher, academic year, semester)
    /// key in one step. Never patch a stored view in place.
    fn upsert_workload(&mut self, workload: TeacherWorkload) -> Result<()>;
}

// ============================================================================
// Dataset
// ============================================================================

/// A whole timetable world as flat record lists. This is the JSON shape the
/// CLI loads and the fixture shape tests build stores from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub offerings: Vec<SubjectOffering>,
    #[serde(default)]
    pub schedules: Vec<Schedule>,
}

// ============================================================================
// MemoryStore
// ============================================================================

/// In-memory [`TimetableStore`]. BTree maps keep iteration order
/// deterministic, which the workload tests rely on.
#[derive(Debug, Default)]
pub struct MemoryStore {
    subjects: BTreeMap<String, Subject>,
    courses: BTreeMap<String, Course>,
    teachers: BTreeMap<String, Teacher>,
    offerings: BTreeMap<String, SubjectOffering>,
    schedules: BTreeMap<String, Schedule>,
    workloads: BTreeMap<(String, String, u32), TeacherWorkload>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a [`Dataset`], bypassing creation-time checks.
    /// Dataset records are trusted as already-persisted state.
    pub fn from_dataset(dataset: Dataset) -> Self {
        let mut store = Self::new();
        for s in dataset.subjects {
            store.subjects.insert(s.id.clone(), s);
        }
        for c in dataset.courses {
            store.courses.insert(c.id.clone(), c);
        }
        for t in dataset.teachers {
            store.teachers.insert(t.id.clone(), t);
        }
        for o in dataset.offerings {
            store.offerings.insert(o.id.clone(), o);
        }
        for s in dataset.schedules {
            store.schedules.insert(s.id.clone(), s);
        }
        store
    }

    pub fn add_subject(&mut self, subject: Subject) {
        self.subjects.insert(subject.id.clone(), subject);
    }

    pub fn add_course(&mut self, course: Course) {
        self.courses.insert(course.id.clone(), course);
    }

    pub fn add_teacher(&mut self, teacher: Teacher) {
        self.teachers.insert(teacher.id.clone(), teacher);
    }

    /// Create an offering, rejecting overlaps with any existing *active*
    /// offering for the same subject/term whose course set intersects.
    pub fn create_offering(&mut self, offering: SubjectOffering) -> Result<()> {
        if self.offerings.contains_key(&offering.id) {
            return Err(TimetableError::Duplicate(format!(
                "offering {} already exists",
                offering.id
            )));
        }
        if let Some(existing) = self
            .offerings
            .values()
            .find(|o| o.active && o.clashes_with(&offering))
        {
            return Err(TimetableError::Duplicate(format!(
                "subject {} is already offered to an overlapping course set in {} sem {} ({})",
                offering.subject_id, offering.academic_year, offering.semester, existing.id
            )));
        }
        self.offerings.insert(offering.id.clone(), offering);
        Ok(())
    }

    /// Soft-delete: the offering stays for historical workload, but stops
    /// participating in validation and new workload math.
    pub fn deactivate_offering(&mut self, id: &str) -> Result<()> {
        let offering = self
            .offerings
            .get_mut(id)
            .ok_or_else(|| TimetableError::not_found("offering", id))?;
        offering.active = false;
        Ok(())
    }

    pub fn deactivate_schedule(&mut self, id: &str) -> Result<()> {
        let schedule = self
            .schedules
            .get_mut(id)
            .ok_or_else(|| TimetableError::not_found("schedule", id))?;
        schedule.active = false;
        Ok(())
    }

    /// Validate-then-persist for a schedule create or update.
    ///
    /// Runs all three validators against the current snapshot (excluding the
    /// schedule's own stored version from the cross check). The schedule is
    /// written only when the validation comes back clean; on findings the
    /// store is untouched and the findings are returned for the caller to
    /// report. A second active schedule for the same context is a
    /// [`TimetableError::Duplicate`].
    pub fn save_schedule(&mut self, schedule: Schedule) -> Result<ScheduleValidation> {
        let context = schedule.context();
        if self.schedules.values().any(|s| {
            s.active && s.id != schedule.id && s.context() == context
        }) {
            return Err(TimetableError::Duplicate(format!(
                "an active schedule already exists for {}",
                schedule.label()
            )));
        }

        let validation = validate::validate_schedule_write(self, &schedule)?;
        if validation.is_clean() {
            self.schedules.insert(schedule.id.clone(), schedule);
        }
        Ok(validation)
    }

    /// Flip a teacher's overload flag. This is the explicit approval path
    /// after a unit-limit check came back `requires_overload`; it is a plain
    /// flag write and is not re-validated against any cap.
    pub fn set_overload(&mut self, teacher_id: &str, overloaded: bool) -> Result<()> {
        let teacher = self
            .teachers
            .get_mut(teacher_id)
            .ok_or_else(|| TimetableError::not_found("teacher", teacher_id))?;
        teacher.is_overloaded = overloaded;
        Ok(())
    }

    pub fn schedule(&self, id: &str) -> Result<&Schedule> {
        self.schedules
            .get(id)
            .ok_or_else(|| TimetableError::not_found("schedule", id))
    }
}

impl SubjectResolver for MemoryStore {
    fn resolve_subject(&self, subject_ref: &SubjectRef) -> Result<&Subject> {
        match subject_ref {
            SubjectRef::Subject(id) => self.subject(id),
            SubjectRef::Offering(id) => {
                let offering = self
                    .offerings
                    .get(id)
                    .ok_or_else(|| TimetableError::not_found("offering", id.clone()))?;
                self.subject(&offering.subject_id)
            }
        }
    }
}

impl TimetableStore for MemoryStore {
    fn subject(&self, id: &str) -> Result<&Subject> {
        self.subjects
            .get(id)
            .ok_or_else(|| TimetableError::not_found("subject", id))
    }

    fn course(&self, id: &str) -> Result<&Course> {
        self.courses
            .get(id)
            .ok_or_else(|| TimetableError::not_found("course", id))
    }

    fn teacher(&self, id: &str) -> Result<&Teacher> {
        self.teachers
            .get(id)
            .ok_or_else(|| TimetableError::not_found("teacher", id))
    }

    fn active_offerings(&self, academic_year: &str, semester: u32) -> Vec<&SubjectOffering> {
        self.offerings
            .values()
            .filter(|o| o.active && o.academic_year == academic_year && o.semester == semester)
            .collect()
    }

    fn active_schedules(&self) -> Vec<&Schedule> {
        self.schedules.values().filter(|s| s.active).collect()
    }

    fn schedule_for(&self, course_id: &str, year_level: u32, semester: u32) -> Option<&Schedule> {
        self.schedules.values().find(|s| {
            s.active
                && s.course_id == course_id
                && s.year_level == year_level
                && s.semester == semester
        })
    }

    fn workload(
        &self,
        teacher_id: &str,
        academic_year: &str,
        semester: u32,
    ) -> Option<&TeacherWorkload> {
        self.workloads
            .get(&(teacher_id.to_string(), academic_year.to_string(), semester))
    }

    fn upsert_workload(&mut self, workload: TeacherWorkload) -> Result<()> {
        let key = (
            workload.teacher_id.clone(),
            workload.academic_year.clone(),
            workload.semester,
        );
        self.workloads.insert(key, workload);
        Ok(())
    }
}
