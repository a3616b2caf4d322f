// ==========================================
// LessonApi 集成测试
// ==========================================
// 测试目标: 手工课时维护、课表查询、时段检索
// ==========================================

mod test_helpers;

use chrono::NaiveTime;
use lesson_scheduler::api::ApiError;
use lesson_scheduler::app::AppState;
use lesson_scheduler::config::ScheduleConfig;
use lesson_scheduler::domain::{DayOfWeek, NewLesson};
use test_helpers::{create_app_state, create_test_db, hm};

struct Fixture {
    subject_id: i64,
    teacher_id: i64,
    group_id: i64,
}

fn fixture(state: &AppState) -> Fixture {
    let api = &state.school_api;
    let subject = api.create_subject("Math", 4).unwrap();
    let teacher = api.create_teacher("Ana", "ana@school.test").unwrap();
    let group = api.create_group("1A").unwrap();
    api.assign_subject(teacher.teacher_id, subject.subject_id).unwrap();
    Fixture {
        subject_id: subject.subject_id,
        teacher_id: teacher.teacher_id,
        group_id: group.group_id,
    }
}

fn new_lesson(f: &Fixture, day: DayOfWeek, start_h: u32, end_h: u32) -> NewLesson {
    NewLesson {
        subject_id: f.subject_id,
        teacher_id: f.teacher_id,
        group_id: f.group_id,
        day,
        start_time: hm(start_h, 0),
        end_time: hm(end_h, 0),
    }
}

#[test]
fn test_create_lesson_validation() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = create_app_state(&db_path, &ScheduleConfig::default());
    let f = fixture(&state);
    let api = &state.lesson_api;

    assert!(matches!(
        api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 9, 9)),
        Err(ApiError::InvalidInput(_))
    ));

    let mut bad = new_lesson(&f, DayOfWeek::Monday, 8, 9);
    bad.group_id = 999;
    assert!(matches!(api.create_lesson(&bad), Err(ApiError::NotFound(_))));

    let mut bad = new_lesson(&f, DayOfWeek::Monday, 8, 9);
    bad.subject_id = 999;
    assert!(matches!(api.create_lesson(&bad), Err(ApiError::NotFound(_))));

    let saved = api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 8, 9)).unwrap();
    assert_eq!(api.get_lesson(saved.lesson_id).unwrap(), saved);
}

#[test]
fn test_lesson_times_must_be_whole_minutes() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = create_app_state(&db_path, &ScheduleConfig::default());
    let f = fixture(&state);
    let api = &state.lesson_api;

    // 08:00:30-08:00:45 存储后会变成 08:00-08:00
    let mut lesson = new_lesson(&f, DayOfWeek::Monday, 8, 9);
    lesson.start_time = NaiveTime::from_hms_opt(8, 0, 30).unwrap();
    lesson.end_time = NaiveTime::from_hms_opt(8, 0, 45).unwrap();
    assert!(matches!(api.create_lesson(&lesson), Err(ApiError::InvalidInput(_))));
    assert!(api.list_lessons().unwrap().is_empty());

    let mut saved = api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 8, 9)).unwrap();
    saved.end_time = NaiveTime::from_hms_opt(8, 59, 59).unwrap();
    assert!(matches!(api.update_lesson(&saved), Err(ApiError::InvalidInput(_))));

    let stored = api.get_lesson(saved.lesson_id).unwrap();
    assert_eq!((stored.start_time, stored.end_time), (hm(8, 0), hm(9, 0)));

    assert!(matches!(
        api.search_by_day_and_time(
            DayOfWeek::Monday,
            NaiveTime::from_hms_opt(8, 30, 15).unwrap(),
            hm(9, 0)
        ),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_manual_lessons_skip_conflict_checks() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = create_app_state(&db_path, &ScheduleConfig::default());
    let f = fixture(&state);
    let api = &state.lesson_api;

    // 手工录入不做占用校验，同一时段可重复
    api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 8, 9)).unwrap();
    api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 8, 9)).unwrap();
    assert_eq!(api.list_lessons().unwrap().len(), 2);
}

#[test]
fn test_update_and_delete_lesson() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = create_app_state(&db_path, &ScheduleConfig::default());
    let f = fixture(&state);
    let api = &state.lesson_api;

    let mut lesson = api.create_lesson(&new_lesson(&f, DayOfWeek::Tuesday, 10, 11)).unwrap();
    lesson.day = DayOfWeek::Thursday;
    lesson.start_time = hm(14, 0);
    lesson.end_time = hm(15, 0);
    api.update_lesson(&lesson).unwrap();
    assert_eq!(api.get_lesson(lesson.lesson_id).unwrap(), lesson);

    lesson.end_time = hm(13, 0);
    assert!(matches!(api.update_lesson(&lesson), Err(ApiError::InvalidInput(_))));

    api.delete_lesson(lesson.lesson_id).unwrap();
    assert!(matches!(api.get_lesson(lesson.lesson_id), Err(ApiError::NotFound(_))));
    assert!(matches!(api.delete_lesson(lesson.lesson_id), Err(ApiError::NotFound(_))));
}

#[test]
fn test_timetables_ordered_through_week() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = create_app_state(&db_path, &ScheduleConfig::default());
    let f = fixture(&state);
    let api = &state.lesson_api;

    api.create_lesson(&new_lesson(&f, DayOfWeek::Friday, 8, 9)).unwrap();
    api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 15, 16)).unwrap();
    api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 9, 10)).unwrap();
    api.create_lesson(&new_lesson(&f, DayOfWeek::Wednesday, 8, 9)).unwrap();

    let expected = vec![
        (DayOfWeek::Monday, hm(9, 0)),
        (DayOfWeek::Monday, hm(15, 0)),
        (DayOfWeek::Wednesday, hm(8, 0)),
        (DayOfWeek::Friday, hm(8, 0)),
    ];

    let by_teacher: Vec<_> = api
        .list_by_teacher(f.teacher_id)
        .unwrap()
        .into_iter()
        .map(|l| (l.day, l.start_time))
        .collect();
    assert_eq!(by_teacher, expected);

    let by_group: Vec<_> = api
        .list_by_group(f.group_id)
        .unwrap()
        .into_iter()
        .map(|l| (l.day, l.start_time))
        .collect();
    assert_eq!(by_group, expected);

    assert!(matches!(api.list_by_teacher(999), Err(ApiError::NotFound(_))));
    assert!(matches!(api.list_by_group(999), Err(ApiError::NotFound(_))));
}

#[test]
fn test_search_by_day_and_time_includes_touching() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = create_app_state(&db_path, &ScheduleConfig::default());
    let f = fixture(&state);
    let api = &state.lesson_api;

    api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 8, 9)).unwrap();
    api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 10, 11)).unwrap();
    api.create_lesson(&new_lesson(&f, DayOfWeek::Monday, 12, 13)).unwrap();
    api.create_lesson(&new_lesson(&f, DayOfWeek::Tuesday, 10, 11)).unwrap();

    // 08-09 在 09:00 相接，10-11 相交，12-13 不相接
    let found: Vec<_> = api
        .search_by_day_and_time(DayOfWeek::Monday, hm(9, 0), hm(10, 30))
        .unwrap()
        .into_iter()
        .map(|l| l.start_time)
        .collect();
    assert_eq!(found, vec![hm(8, 0), hm(10, 0)]);

    // 单点查询
    let found = api
        .search_by_day_and_time(DayOfWeek::Monday, hm(11, 0), hm(11, 0))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].start_time, hm(10, 0));

    assert!(matches!(
        api.search_by_day_and_time(DayOfWeek::Monday, hm(11, 0), hm(10, 0)),
        Err(ApiError::InvalidInput(_))
    ));
}

#[test]
fn test_generate_schedule_through_api() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let state = create_app_state(&db_path, &ScheduleConfig::default());
    let f = fixture(&state);

    let report = state.lesson_api.generate_schedule().unwrap();
    assert_eq!(report.required_total, 4);
    assert!(report.is_complete());

    let lessons = state.lesson_api.list_by_group(f.group_id).unwrap();
    assert_eq!(lessons.len(), 4);
    assert!(lessons.iter().all(|l| l.teacher_id == f.teacher_id));
}
