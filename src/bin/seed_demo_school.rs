// ==========================================
// 课表排课系统 - 演示数据
// ==========================================
// 用法: seed_demo_school [db_path]
// 流程: 备份并重建数据库 -> 写入教师/学科/班级/资格/时间约束 -> 生成课表 -> 输出 JSON
// ==========================================

use chrono::{Local, NaiveTime};
use std::error::Error;
use std::fs;
use std::path::Path;

use lesson_scheduler::app::{get_default_db_path, AppState};
use lesson_scheduler::domain::{AvailabilityKind, DayOfWeek, NewAvailability};
use lesson_scheduler::logging;

// (学科, 每周课时)
const SUBJECTS: [(&str, u32); 5] = [
    ("Matemática", 4),
    ("Português", 4),
    ("História", 2),
    ("Geografia", 2),
    ("Ciências", 3),
];

const GROUPS: [&str; 3] = ["1º Ano A", "1º Ano B", "2º Ano A"];

// (姓名, 邮箱, 可任教学科)
const TEACHERS: [(&str, &str, &[&str]); 4] = [
    ("Ana Souza", "ana.souza@escola.edu", &["Matemática", "Ciências"]),
    ("Bruno Lima", "bruno.lima@escola.edu", &["Português", "História"]),
    ("Carla Mendes", "carla.mendes@escola.edu", &["Geografia"]),
    ("Daniel Rocha", "daniel.rocha@escola.edu", &["Matemática"]),
];

fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path)?;
    let api = &state.school_api;

    // ==========================================
    // 学科 / 班级
    // ==========================================
    let mut subject_ids = Vec::new();
    for (name, weekly_lessons) in SUBJECTS {
        let subject = api.create_subject(name, weekly_lessons)?;
        subject_ids.push((name, subject.subject_id));
    }
    for name in GROUPS {
        api.create_group(name)?;
    }

    // ==========================================
    // 教师与学科资格
    // ==========================================
    let mut teacher_ids = Vec::new();
    for (name, email, subjects) in TEACHERS {
        let teacher = api.create_teacher(name, email)?;
        for subject in subjects {
            if let Some((_, subject_id)) = subject_ids.iter().find(|(n, _)| n == subject) {
                api.assign_subject(teacher.teacher_id, *subject_id)?;
            }
        }
        teacher_ids.push(teacher.teacher_id);
    }

    // ==========================================
    // 时间约束: 每种类型各一条
    // ==========================================
    let records = [
        (0, DayOfWeek::Monday, (8, 0), (12, 0), AvailabilityKind::Unavailable, "Folga"),
        (1, DayOfWeek::Tuesday, (14, 0), (18, 0), AvailabilityKind::AdministrativeBlock, "Reunião pedagógica"),
        (2, DayOfWeek::Wednesday, (8, 0), (12, 0), AvailabilityKind::Preference, "Prefere manhãs livres"),
        (3, DayOfWeek::Friday, (16, 0), (18, 0), AvailabilityKind::Restriction, "Outro vínculo"),
    ];
    for (teacher_idx, day, start, end, kind, note) in records {
        api.create_availability(&NewAvailability {
            teacher_id: teacher_ids[teacher_idx],
            day,
            start_time: hm(start)?,
            end_time: hm(end)?,
            kind,
            note: Some(note.to_string()),
        })?;
    }

    // ==========================================
    // 生成课表
    // ==========================================
    let report = state.lesson_api.generate_schedule()?;
    eprintln!(
        "Seeded {}: placed={}, unplaced={}, required={}",
        state.db_path,
        report.placed_count(),
        report.unplaced_count(),
        report.required_total
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

fn hm((h, m): (u32, u32)) -> Result<NaiveTime, Box<dyn Error>> {
    NaiveTime::from_hms_opt(h, m, 0).ok_or_else(|| format!("无效时间 {:02}:{:02}", h, m).into())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}
