//! # timetable-engine
//!
//! Constraint checking and derived workload metrics for academic
//! timetables. The engine validates proposed weekly schedules -- it never
//! searches for conflict-free alternatives -- and derives per-teacher unit
//! workloads from offerings and published schedules.
//!
//! ## Modules
//!
//! - [`clock`] — "HH:MM" wall-clock parsing and half-open interval overlap
//! - [`model`] — subjects, courses, offerings, schedules, teachers, workload
//! - [`conflict`] — intra- and cross-schedule conflict detection
//! - [`hours`] — curricular weekly-hours validation
//! - [`workload`] — unit/workload derivation and breakdown rendering
//! - [`unit_limit`] — pre-assignment unit-cap check
//! - [`validate`] — the schedule-write gate composing the three validators
//! - [`store`] — storage trait seam + in-memory reference store
//! - [`error`] — error types

pub mod clock;
pub mod conflict;
pub mod error;
pub mod hours;
pub mod model;
pub mod store;
pub mod unit_limit;
pub mod validate;
pub mod workload;

pub use clock::{overlaps, to_minutes};
pub use conflict::{find_cross_conflicts, find_internal_conflicts, ConflictKind, CrossConflict, InternalConflict};
pub use error::{Result, TimetableError};
pub use hours::{validate_hours, HoursViolation};
pub use model::{
    Course, Day, EmploymentType, Schedule, ScheduleContext, ScheduleEvent, SessionType, Subject,
    SubjectOffering, SubjectRef, Teacher, TeacherAssignment, TeacherRef, TeacherWorkload,
    TeachingAssignment, UNLIMITED_UNITS,
};
pub use store::{Dataset, MemoryStore, SubjectResolver, TimetableStore};
pub use unit_limit::{check_unit_limit, UnitLimitDecision};
pub use validate::{validate_schedule_write, ScheduleValidation};
pub use workload::{calculate_teacher_workload, recalculate_all_workloads, render_breakdown};
