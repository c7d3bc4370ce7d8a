//! Domain model -- subjects, courses, offerings, schedules and teachers.
//!
//! All types are plain serde-serializable data. Identity between records is
//! by string id; references that may arrive either as a bare id or as a
//! populated object are modeled with [`TeacherRef`], and ids that may denote
//! either a subject or an offering are modeled with the tagged [`SubjectRef`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock;
use crate::error::Result;

/// Sentinel unit cap for overloaded full-time teachers. Large enough to
/// never constrain a real workload, finite so it stores and serializes like
/// any other cap.
pub const UNLIMITED_UNITS: u32 = 9999;

// ============================================================================
// Calendar primitives
// ============================================================================

/// Day of the week for a recurring weekly event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        };
        f.write_str(name)
    }
}

/// Kind of teaching session an event realizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Lecture,
    Lab,
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionType::Lecture => f.write_str("lecture"),
            SessionType::Lab => f.write_str("lab"),
        }
    }
}

// ============================================================================
// References
// ============================================================================

/// A reference to a teacher that tolerates both id-only and populated shapes.
///
/// Upstream data sometimes carries a bare teacher id and sometimes a
/// `{ id, name }` object. All identity comparisons go through [`TeacherRef::same_as`]
/// so the shape never leaks into the checkers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TeacherRef {
    Populated { id: String, name: String },
    Id(String),
}

impl TeacherRef {
    pub fn id(&self) -> &str {
        match self {
            TeacherRef::Id(id) => id,
            TeacherRef::Populated { id, .. } => id,
        }
    }

    /// Display name when the reference is populated.
    pub fn name(&self) -> Option<&str> {
        match self {
            TeacherRef::Id(_) => None,
            TeacherRef::Populated { name, .. } => Some(name),
        }
    }

    /// Identity comparison against a raw id, regardless of reference shape.
    pub fn same_as(&self, teacher_id: &str) -> bool {
        self.id() == teacher_id
    }
}

/// A reference that may denote either a subject or a subject offering.
///
/// Offerings transparently proxy their subject for hours and unit purposes;
/// the reference is resolved once at the boundary (see
/// [`SubjectResolver`](crate::store::SubjectResolver)) rather than branching
/// on lookup success throughout the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum SubjectRef {
    Subject(String),
    Offering(String),
}

impl SubjectRef {
    pub fn raw_id(&self) -> &str {
        match self {
            SubjectRef::Subject(id) => id,
            SubjectRef::Offering(id) => id,
        }
    }
}

// ============================================================================
// Curriculum
// ============================================================================

/// Curricular master record for one subject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    /// Unique catalog code (e.g. "CS101").
    pub code: String,
    pub name: String,
    pub has_lab: bool,
    pub lecture_units: u32,
    pub lab_units: u32,
    /// Weekly contact-hour requirement used by the hours validator.
    pub required_hours: f64,
}

/// Weekly requirement for one session type of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionRequirement {
    pub session_type: SessionType,
    pub required_hours: f64,
    pub expected_sessions: u32,
}

impl Subject {
    /// Create a subject with the default unit split for its kind:
    /// lecture-only subjects get 3/0 units, subjects with a lab get 2/1.
    pub fn new(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        has_lab: bool,
    ) -> Self {
        let (lecture_units, lab_units) = if has_lab { (2, 1) } else { (3, 0) };
        Self::with_units(id, code, name, lecture_units, lab_units)
    }

    /// Create a subject with an explicit unit split. `has_lab` and
    /// `required_hours` are derived (`lecture + lab x 3` hours per week).
    pub fn with_units(
        id: impl Into<String>,
        code: impl Into<String>,
        name: impl Into<String>,
        lecture_units: u32,
        lab_units: u32,
    ) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            has_lab: lab_units > 0,
            lecture_units,
            lab_units,
            required_hours: f64::from(lecture_units) + f64::from(lab_units) * 3.0,
        }
    }

    /// Static per-subject unit figure: `lecture_units + lab_units`.
    pub fn total_units(&self) -> u32 {
        self.lecture_units + self.lab_units
    }

    /// The weekly requirement for one session type, or `None` when the
    /// subject has no such component (no lab requirement without lab units).
    pub fn requirement_for(&self, session_type: SessionType) -> Option<SessionRequirement> {
        match session_type {
            SessionType::Lecture => Some(SessionRequirement {
                session_type,
                required_hours: f64::from(self.lecture_units),
                expected_sessions: 1,
            }),
            SessionType::Lab if self.lab_units > 0 => Some(SessionRequirement {
                session_type,
                required_hours: f64::from(self.lab_units) * 3.0,
                expected_sessions: 2,
            }),
            SessionType::Lab => None,
        }
    }

    /// All weekly session requirements for this subject.
    pub fn session_requirements(&self) -> Vec<SessionRequirement> {
        [SessionType::Lecture, SessionType::Lab]
            .into_iter()
            .filter_map(|st| self.requirement_for(st))
            .collect()
    }

    /// Strict-equality check: the scheduled hours for every session type
    /// exactly match the requirement. The schedule-write gate deliberately
    /// does not use this (under-scheduling is accepted there); it exists for
    /// callers that want to confirm a finished timetable.
    pub fn hours_exactly_satisfied(&self, scheduled: &[(SessionType, f64)]) -> bool {
        self.session_requirements().iter().all(|req| {
            let total: f64 = scheduled
                .iter()
                .filter(|(st, _)| *st == req.session_type)
                .map(|(_, h)| h)
                .sum();
            (total - req.required_hours).abs() < f64::EPSILON
        })
    }
}

/// Academic program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub description: String,
}

// ============================================================================
// Offerings and schedules
// ============================================================================

/// One teacher assigned to an offering, with a role tag (e.g. "lecture",
/// "lab").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherAssignment {
    pub teacher: TeacherRef,
    #[serde(default)]
    pub role: String,
}

/// A subject bound to one or more courses for a specific term.
///
/// Multiple course ids model combined (cross-listed) sections taught
/// together. Offerings are soft-deleted via `active`, never removed, so
/// historical workload stays reconstructable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectOffering {
    pub id: String,
    pub subject_id: String,
    pub course_ids: Vec<String>,
    pub year_level: u32,
    pub semester: u32,
    pub academic_year: String,
    #[serde(default)]
    pub assigned_teachers: Vec<TeacherAssignment>,
    #[serde(default)]
    pub preferred_rooms: Vec<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl SubjectOffering {
    /// Whether the given teacher id appears among the assigned teachers.
    pub fn has_teacher(&self, teacher_id: &str) -> bool {
        self.assigned_teachers
            .iter()
            .any(|a| a.teacher.same_as(teacher_id))
    }

    /// Whether this offering occupies the same (year, semester, academic
    /// year) slot as another and their course sets intersect.
    pub fn clashes_with(&self, other: &SubjectOffering) -> bool {
        self.subject_id == other.subject_id
            && self.year_level == other.year_level
            && self.semester == other.semester
            && self.academic_year == other.academic_year
            && self
                .course_ids
                .iter()
                .any(|c| other.course_ids.contains(c))
    }
}

fn default_active() -> bool {
    true
}

/// One recurring weekly session within a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub day: Day,
    /// "HH:MM" wall-clock start.
    pub start_time: String,
    /// "HH:MM" wall-clock end; must be after `start_time`.
    pub end_time: String,
    pub session_type: SessionType,
    pub subject: SubjectRef,
    #[serde(default)]
    pub room: Option<String>,
    #[serde(default)]
    pub teacher: Option<TeacherRef>,
}

impl ScheduleEvent {
    /// Parse both times into minute offsets, enforcing `end > start`.
    pub fn minutes(&self) -> Result<(u32, u32)> {
        let start = clock::to_minutes(&self.start_time)?;
        let end = clock::to_minutes(&self.end_time)?;
        if end <= start {
            return Err(crate::error::TimetableError::InvalidTime(format!(
                "{} ends at or before it starts ({}-{})",
                self.day, self.start_time, self.end_time
            )));
        }
        Ok((start, end))
    }

    /// Human-readable time window, e.g. "Monday 09:00-10:00".
    pub fn window(&self) -> String {
        format!("{} {}-{}", self.day, self.start_time, self.end_time)
    }

    /// Room identifier normalized for comparison (trimmed, lowercased).
    /// `None` when the room is missing or blank.
    pub fn room_key(&self) -> Option<String> {
        self.room
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_lowercase)
    }
}

/// The (course, year, semester, academic year) tuple a schedule belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleContext {
    pub course_id: String,
    pub year_level: u32,
    pub semester: u32,
    pub academic_year: String,
}

/// The weekly timetable for one (course, year level, semester, academic
/// year). Events are this schedule's exclusive children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub course_id: String,
    pub year_level: u32,
    pub semester: u32,
    pub academic_year: String,
    #[serde(default)]
    pub events: Vec<ScheduleEvent>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Schedule {
    pub fn context(&self) -> ScheduleContext {
        ScheduleContext {
            course_id: self.course_id.clone(),
            year_level: self.year_level,
            semester: self.semester,
            academic_year: self.academic_year.clone(),
        }
    }

    /// Display name used in conflict messages.
    pub fn label(&self) -> String {
        format!(
            "{} Year {} Sem {} ({})",
            self.course_id, self.year_level, self.semester, self.academic_year
        )
    }
}

// ============================================================================
// Teachers and workload
// ============================================================================

/// Employment type driving the unit cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
}

impl EmploymentType {
    /// Base weekly unit cap, before any overload allowance.
    pub fn base_cap(self) -> u32 {
        match self {
            EmploymentType::PartTime => 18,
            EmploymentType::FullTime => 24,
        }
    }
}

/// A user record as seen by this engine. Only teachers carry meaningful
/// employment data; `role` is checked where it matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    #[serde(default = "default_teacher_role")]
    pub role: String,
    pub employment_type: EmploymentType,
    /// Only meaningful for full-time teachers.
    #[serde(default)]
    pub is_overloaded: bool,
}

fn default_teacher_role() -> String {
    "teacher".to_string()
}

impl Teacher {
    pub fn is_teacher(&self) -> bool {
        self.role == "teacher"
    }

    /// Overload-aware unit cap: part-time 18, full-time 24, overloaded
    /// full-time effectively unbounded.
    pub fn unit_cap(&self) -> u32 {
        match self.employment_type {
            EmploymentType::FullTime if self.is_overloaded => UNLIMITED_UNITS,
            other => other.base_cap(),
        }
    }
}

/// One teaching assignment in a workload view: an offering taught to one of
/// its courses, with the unit math for that pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeachingAssignment {
    pub offering_id: String,
    pub course_id: String,
    pub subject_code: String,
    pub subject_name: String,
    /// `lecture_units + lab_units` for the subject.
    pub subject_units: u32,
    /// Weekly events in the matched schedule that realize this offering.
    pub event_count: u32,
    /// Units credited per course the offering targets, schedule or not.
    pub assignment_units: u32,
    /// Units scaled by actual weekly contact events.
    pub schedule_units: u32,
}

/// Materialized per-(teacher, academic year, semester) workload view.
///
/// Fully rebuildable from offerings and schedules; always replaced whole,
/// never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherWorkload {
    pub teacher_id: String,
    pub teacher_name: String,
    pub academic_year: String,
    pub semester: u32,
    pub assignments: Vec<TeachingAssignment>,
    pub total_assignment_units: u32,
    pub total_schedule_units: u32,
    pub max_unit_limit: u32,
}
