// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use chrono::NaiveTime;
use lesson_scheduler::app::AppState;
use lesson_scheduler::config::{ConfigManager, ScheduleConfig};
use lesson_scheduler::db::{init_schema, open_sqlite_connection};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开共享连接（与 AppState 相同的 PRAGMA）
pub fn open_shared(db_path: &str) -> Arc<Mutex<Connection>> {
    let conn = open_sqlite_connection(db_path).expect("打开测试数据库失败");
    Arc::new(Mutex::new(conn))
}

/// 以指定排课参数创建 AppState
pub fn create_app_state(db_path: &str, config: &ScheduleConfig) -> AppState {
    let conn = open_shared(db_path);
    ConfigManager::from_connection(conn.clone())
        .save_schedule_config(config)
        .expect("写入排课参数失败");
    AppState::from_connection(db_path.to_string(), conn).expect("初始化AppState失败")
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
