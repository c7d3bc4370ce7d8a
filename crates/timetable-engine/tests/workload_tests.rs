//! Tests for teacher workload derivation.

use timetable_engine::model::{
    Day, EmploymentType, Schedule, ScheduleEvent, SessionType, Subject, SubjectOffering,
    SubjectRef, Teacher, TeacherAssignment, TeacherRef, UNLIMITED_UNITS,
};
use timetable_engine::store::{Dataset, MemoryStore, TimetableStore};
use timetable_engine::workload::{
    calculate_teacher_workload, recalculate_all_workloads, render_breakdown,
};

const AY: &str = "2024-2025";

fn teacher(id: &str, name: &str) -> Teacher {
    Teacher {
        id: id.to_string(),
        name: name.to_string(),
        role: "teacher".to_string(),
        employment_type: EmploymentType::FullTime,
        is_overloaded: false,
    }
}

fn offering(id: &str, subject: &str, courses: &[&str], teacher_id: &str) -> SubjectOffering {
    SubjectOffering {
        id: id.to_string(),
        subject_id: subject.to_string(),
        course_ids: courses.iter().map(|c| c.to_string()).collect(),
        year_level: 1,
        semester: 1,
        academic_year: AY.to_string(),
        assigned_teachers: vec![TeacherAssignment {
            teacher: TeacherRef::Id(teacher_id.to_string()),
            role: "lecture".to_string(),
        }],
        preferred_rooms: vec![],
        active: true,
    }
}

fn offering_event(offering_id: &str) -> ScheduleEvent {
    ScheduleEvent {
        day: Day::Monday,
        start_time: "09:00".to_string(),
        end_time: "11:00".to_string(),
        session_type: SessionType::Lecture,
        subject: SubjectRef::Offering(offering_id.to_string()),
        room: None,
        teacher: None,
    }
}

fn schedule(id: &str, course: &str, events: Vec<ScheduleEvent>) -> Schedule {
    Schedule {
        id: id.to_string(),
        course_id: course.to_string(),
        year_level: 1,
        semester: 1,
        academic_year: AY.to_string(),
        events,
        active: true,
    }
}

/// Combined offering scenario: one 2/1 subject (3 units) offered to BSIT and
/// BSCS together, one published schedule for BSIT with one matching event,
/// no schedule for BSCS yet.
fn combined_offering_store() -> MemoryStore {
    MemoryStore::from_dataset(Dataset {
        subjects: vec![Subject::with_units("cs102", "CS102", "Programming 1", 2, 1)],
        courses: vec![],
        teachers: vec![teacher("t1", "Alice Reyes")],
        offerings: vec![offering("off-1", "cs102", &["BSCS", "BSIT"], "t1")],
        schedules: vec![schedule("sched-bsit", "BSIT", vec![offering_event("off-1")])],
    })
}

#[test]
fn assignment_units_count_per_course_schedule_units_per_event() {
    let mut store = combined_offering_store();

    let workload = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();

    assert_eq!(workload.assignments.len(), 2);
    let bscs = &workload.assignments[0];
    let bsit = &workload.assignments[1];
    assert_eq!(bscs.course_id, "BSCS");
    assert_eq!(bscs.assignment_units, 3);
    assert_eq!(bscs.event_count, 0, "no schedule published for BSCS");
    assert_eq!(bscs.schedule_units, 0);
    assert_eq!(bsit.course_id, "BSIT");
    assert_eq!(bsit.assignment_units, 3);
    assert_eq!(bsit.event_count, 1);
    assert_eq!(bsit.schedule_units, 3);

    assert_eq!(workload.total_assignment_units, 6);
    assert_eq!(workload.total_schedule_units, 3);
}

#[test]
fn recomputation_is_idempotent() {
    let mut store = combined_offering_store();

    let first = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();
    let second = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();

    assert_eq!(first, second);
    assert_eq!(store.workload("t1", AY, 1), Some(&second));
}

#[test]
fn schedule_units_scale_with_event_count() {
    let mut store = combined_offering_store();
    // Second weekly event for the same offering: its lab session.
    let mut lab = offering_event("off-1");
    lab.day = Day::Wednesday;
    lab.session_type = SessionType::Lab;
    lab.start_time = "13:00".to_string();
    lab.end_time = "15:00".to_string();
    let sched = schedule("sched-bsit", "BSIT", vec![offering_event("off-1"), lab]);
    let validation = store.save_schedule(sched).unwrap();
    assert!(validation.is_clean());

    let workload = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();

    assert_eq!(workload.total_schedule_units, 6);
    assert_eq!(workload.total_assignment_units, 6);
}

#[test]
fn subject_shaped_event_references_also_match_the_offering() {
    let mut store = combined_offering_store();
    let mut sched = schedule("sched-bsit", "BSIT", vec![offering_event("off-1")]);
    sched.events[0].subject = SubjectRef::Subject("cs102".to_string());
    store.save_schedule(sched).unwrap();

    let workload = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();

    assert_eq!(workload.total_schedule_units, 3);
}

#[test]
fn inactive_offerings_are_ignored() {
    let mut store = combined_offering_store();
    store.deactivate_offering("off-1").unwrap();

    let workload = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();

    assert!(workload.assignments.is_empty());
    assert_eq!(workload.total_assignment_units, 0);
    assert_eq!(workload.total_schedule_units, 0);
}

#[test]
fn populated_teacher_references_match_too() {
    let mut store = combined_offering_store();
    let mut off = offering("off-2", "cs102", &["BSHM"], "ignored");
    off.year_level = 2;
    off.assigned_teachers = vec![TeacherAssignment {
        teacher: TeacherRef::Populated {
            id: "t1".to_string(),
            name: "Alice Reyes".to_string(),
        },
        role: "lecture".to_string(),
    }];
    store.create_offering(off).unwrap();

    let workload = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();

    assert_eq!(workload.assignments.len(), 3);
    assert_eq!(workload.total_assignment_units, 9);
}

#[test]
fn overloaded_full_timer_gets_the_sentinel_cap() {
    let mut store = combined_offering_store();
    store.add_teacher(Teacher {
        is_overloaded: true,
        ..teacher("t1", "Alice Reyes")
    });

    let workload = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();

    assert_eq!(workload.max_unit_limit, UNLIMITED_UNITS);
}

#[test]
fn unknown_teacher_fails_before_any_upsert() {
    let mut store = combined_offering_store();

    assert!(calculate_teacher_workload(&mut store, "ghost", AY, 1).is_err());
    assert!(store.workload("ghost", AY, 1).is_none());
}

#[test]
fn fleet_recompute_covers_every_assigned_teacher() {
    let mut store = combined_offering_store();
    store.add_teacher(teacher("t2", "Ben Cruz"));
    let mut off = offering("off-2", "cs102", &["BSHM"], "t2");
    off.year_level = 2;
    store.create_offering(off).unwrap();

    let workloads = recalculate_all_workloads(&mut store, AY, 1).unwrap();

    assert_eq!(workloads.len(), 2);
    assert!(store.workload("t1", AY, 1).is_some());
    assert!(store.workload("t2", AY, 1).is_some());
}

#[test]
fn fleet_recompute_fails_fast_on_an_unknown_teacher() {
    let mut store = combined_offering_store();
    // Offering naming a teacher with no user record.
    let mut off = offering("off-2", "cs102", &["BSHM"], "ghost");
    off.year_level = 2;
    store.create_offering(off).unwrap();

    assert!(recalculate_all_workloads(&mut store, AY, 1).is_err());
}

#[test]
fn breakdown_renders_assignments_and_totals() {
    let mut store = combined_offering_store();
    let workload = calculate_teacher_workload(&mut store, "t1", AY, 1).unwrap();

    let text = render_breakdown(&workload);

    assert!(text.contains("Workload for Alice Reyes"));
    assert!(text.contains("CS102"));
    assert!(text.contains("Total assignment units: 6"));
    assert!(text.contains("Total schedule units: 3"));
}
