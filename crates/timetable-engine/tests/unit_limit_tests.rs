//! Tests for the pre-assignment unit-limit check.

use timetable_engine::model::{
    EmploymentType, Subject, SubjectOffering, Teacher, TeacherAssignment, TeacherRef,
};
use timetable_engine::store::{Dataset, MemoryStore};
use timetable_engine::unit_limit::check_unit_limit;

const AY: &str = "2024-2025";

fn full_timer(overloaded: bool) -> Teacher {
    Teacher {
        id: "t1".to_string(),
        name: "Alice Reyes".to_string(),
        role: "teacher".to_string(),
        employment_type: EmploymentType::FullTime,
        is_overloaded: overloaded,
    }
}

fn offering(id: &str, subject: &str, year: u32) -> SubjectOffering {
    SubjectOffering {
        id: id.to_string(),
        subject_id: subject.to_string(),
        course_ids: vec!["BSIT".to_string()],
        year_level: year,
        semester: 1,
        academic_year: AY.to_string(),
        assigned_teachers: vec![TeacherAssignment {
            teacher: TeacherRef::Id("t1".to_string()),
            role: "lecture".to_string(),
        }],
        preferred_rooms: vec![],
        active: true,
    }
}

/// Teacher currently at 21 units: seven 3-unit subjects assigned, plus an
/// unassigned 4-unit subject to add.
fn store_at_21_units(teacher: Teacher) -> MemoryStore {
    let mut subjects: Vec<Subject> = (1..=7)
        .map(|i| Subject::with_units(format!("s{i}"), format!("S{i}"), format!("Subject {i}"), 3, 0))
        .collect();
    subjects.push(Subject::with_units("big", "BIG", "Capstone", 3, 1));

    let offerings = (1..=7)
        .map(|i| offering(&format!("off-{i}"), &format!("s{i}"), i))
        .collect();

    MemoryStore::from_dataset(Dataset {
        subjects,
        courses: vec![],
        teachers: vec![teacher],
        offerings,
        schedules: vec![],
    })
}

#[test]
fn full_timer_over_cap_requires_overload() {
    let store = store_at_21_units(full_timer(false));

    let decision = check_unit_limit(&store, "t1", "big", AY, 1).unwrap();

    assert_eq!(decision.current_units, 21);
    assert_eq!(decision.projected_units, 25);
    assert_eq!(decision.unit_cap, 24);
    assert!(!decision.valid);
    assert!(decision.requires_overload);
}

#[test]
fn overloaded_full_timer_passes_over_cap() {
    let store = store_at_21_units(full_timer(true));

    let decision = check_unit_limit(&store, "t1", "big", AY, 1).unwrap();

    assert!(decision.valid);
    assert!(!decision.requires_overload);
    assert_eq!(decision.projected_units, 25);
}

#[test]
fn within_cap_is_plainly_valid() {
    let mut store = store_at_21_units(full_timer(false));
    store.add_subject(Subject::with_units("tiny", "TINY", "Seminar", 3, 0));

    let decision = check_unit_limit(&store, "t1", "tiny", AY, 1).unwrap();

    assert!(decision.valid);
    assert!(!decision.requires_overload);
    assert_eq!(decision.projected_units, 24, "cap boundary is inclusive");
}

#[test]
fn part_timer_has_no_overload_path() {
    let part_timer = Teacher {
        employment_type: EmploymentType::PartTime,
        ..full_timer(false)
    };
    let store = store_at_21_units(part_timer);

    let decision = check_unit_limit(&store, "t1", "big", AY, 1).unwrap();

    assert_eq!(decision.unit_cap, 18);
    assert!(!decision.valid);
    assert!(!decision.requires_overload, "part-time never gets overload");
}

#[test]
fn recheck_of_an_already_assigned_subject_is_idempotent() {
    let store = store_at_21_units(full_timer(false));

    let decision = check_unit_limit(&store, "t1", "s3", AY, 1).unwrap();

    assert_eq!(decision.projected_units, decision.current_units);
    assert!(decision.valid);
}

#[test]
fn overload_approval_then_recheck_passes() {
    let mut store = store_at_21_units(full_timer(false));
    assert!(!check_unit_limit(&store, "t1", "big", AY, 1).unwrap().valid);

    store.set_overload("t1", true).unwrap();

    let decision = check_unit_limit(&store, "t1", "big", AY, 1).unwrap();
    assert!(decision.valid);
}

#[test]
fn non_teacher_role_is_rejected() {
    let registrar = Teacher {
        role: "registrar".to_string(),
        ..full_timer(false)
    };
    let store = store_at_21_units(registrar);

    let err = check_unit_limit(&store, "t1", "big", AY, 1).unwrap_err();

    assert!(err.to_string().contains("not a teacher"));
}

#[test]
fn missing_teacher_or_subject_is_not_found() {
    let store = store_at_21_units(full_timer(false));

    assert!(check_unit_limit(&store, "ghost", "big", AY, 1).is_err());
    assert!(check_unit_limit(&store, "t1", "ghost", AY, 1).is_err());
}
