// ==========================================
// ConfigManager 集成测试
// ==========================================
// 测试目标: 排课参数的持久化与启动加载
// ==========================================

mod test_helpers;

use lesson_scheduler::app::AppState;
use lesson_scheduler::config::{config_keys, ConfigManager, ScheduleConfig};
use lesson_scheduler::domain::DayOfWeek;
use test_helpers::{create_app_state, create_test_db, hm};

#[test]
fn test_config_manager_creation() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config_manager = ConfigManager::new(&db_path);
    assert!(config_manager.is_ok(), "ConfigManager should be created successfully");
}

#[test]
fn test_saved_config_survives_reopen() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ScheduleConfig {
        day_start: hm(7, 30),
        day_end: hm(12, 30),
        lesson_duration_minutes: 50,
        school_days: vec![DayOfWeek::Monday, DayOfWeek::Wednesday, DayOfWeek::Saturday],
    };

    ConfigManager::new(&db_path)
        .unwrap()
        .save_schedule_config(&config)
        .unwrap();

    let reopened = ConfigManager::new(&db_path).unwrap();
    assert_eq!(reopened.load_schedule_config().unwrap(), config);
    assert_eq!(
        reopened.get_value(config_keys::SCHOOL_DAYS).unwrap().as_deref(),
        Some("MONDAY,WEDNESDAY,SATURDAY")
    );
}

#[test]
fn test_invalid_config_rejected_on_save() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();

    let config = ScheduleConfig {
        lesson_duration_minutes: 0,
        ..ScheduleConfig::default()
    };
    assert!(manager.save_schedule_config(&config).is_err());
    assert!(manager.get_value(config_keys::LESSON_DURATION_MINUTES).unwrap().is_none());
}

#[test]
fn test_app_state_fails_on_invalid_stored_config() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let manager = ConfigManager::new(&db_path).unwrap();
    manager.set_value(config_keys::DAY_START, "18:00").unwrap();
    manager.set_value(config_keys::DAY_END, "08:00").unwrap();

    let result = AppState::new(db_path);
    assert!(result.is_err());
}

#[test]
fn test_generation_uses_stored_config() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ScheduleConfig {
        day_start: hm(8, 0),
        day_end: hm(10, 0),
        lesson_duration_minutes: 60,
        school_days: vec![DayOfWeek::Tuesday],
    };
    let state = create_app_state(&db_path, &config);

    let subject = state.school_api.create_subject("Math", 3).unwrap();
    let teacher = state.school_api.create_teacher("Ana", "ana@school.test").unwrap();
    state.school_api.create_group("1A").unwrap();
    state
        .school_api
        .assign_subject(teacher.teacher_id, subject.subject_id)
        .unwrap();

    // 周二 08-10 仅两个课时
    let report = state.lesson_api.generate_schedule().unwrap();
    assert_eq!(report.placed_count(), 2);
    assert_eq!(report.unplaced_count(), 1);
    assert!(report.placed.iter().all(|l| l.day == DayOfWeek::Tuesday));

    let snapshot = state.config_manager.get_config_snapshot().unwrap();
    assert!(snapshot.contains("TUESDAY"));
}
