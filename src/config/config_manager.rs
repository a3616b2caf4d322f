// ==========================================
// 课表排课系统 - 配置管理器
// ==========================================
// 职责: 排课参数加载、覆写、快照
// 存储: config_kv 表 (key-value)
// 规则: 未覆写的键使用 ScheduleConfig::default()
// ==========================================

use crate::config::schedule_config::{ConfigError, ScheduleConfig};
use crate::db::open_sqlite_connection;
use crate::domain::types::{format_time, parse_time, DayOfWeek};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    pub const DAY_START: &str = "schedule/day_start";
    pub const DAY_END: &str = "schedule/day_end";
    pub const LESSON_DURATION_MINUTES: &str = "schedule/lesson_duration_minutes";
    /// 逗号分隔，例如 "MONDAY,TUESDAY"
    pub const SCHOOL_DAYS: &str = "schedule/school_days";
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        Ok(value)
    }

    /// 写入配置值（覆盖已有值）
    pub fn set_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;

        tracing::debug!(key = %key, value = %value, "配置已更新");
        Ok(())
    }

    /// 加载排课参数
    ///
    /// config_kv 中的覆写值叠加在默认值之上，结果经过 validate
    pub fn load_schedule_config(&self) -> Result<ScheduleConfig, Box<dyn Error>> {
        let mut config = ScheduleConfig::default();

        if let Some(raw) = self.get_value(config_keys::DAY_START)? {
            config.day_start = parse_time(&raw).map_err(|e| invalid(config_keys::DAY_START, e))?;
        }
        if let Some(raw) = self.get_value(config_keys::DAY_END)? {
            config.day_end = parse_time(&raw).map_err(|e| invalid(config_keys::DAY_END, e))?;
        }
        if let Some(raw) = self.get_value(config_keys::LESSON_DURATION_MINUTES)? {
            config.lesson_duration_minutes = raw
                .trim()
                .parse::<u32>()
                .map_err(|e| invalid(config_keys::LESSON_DURATION_MINUTES, e))?;
        }
        if let Some(raw) = self.get_value(config_keys::SCHOOL_DAYS)? {
            config.school_days = parse_school_days(&raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// 保存排课参数（四个键整体写入）
    pub fn save_schedule_config(&self, config: &ScheduleConfig) -> Result<(), Box<dyn Error>> {
        config.validate()?;

        let days = config
            .school_days
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(",");

        self.set_value(config_keys::DAY_START, &format_time(config.day_start))?;
        self.set_value(config_keys::DAY_END, &format_time(config.day_end))?;
        self.set_value(
            config_keys::LESSON_DURATION_MINUTES,
            &config.lesson_duration_minutes.to_string(),
        )?;
        self.set_value(config_keys::SCHOOL_DAYS, &days)?;
        Ok(())
    }

    /// 获取所有配置的快照（JSON格式，键有序）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }
}

fn invalid(key: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: err.to_string(),
    }
}

/// 解析逗号分隔的教学日列表，保持原有顺序
fn parse_school_days(raw: &str) -> Result<Vec<DayOfWeek>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<DayOfWeek>().map_err(|e| invalid(config_keys::SCHOOL_DAYS, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use chrono::NaiveTime;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_load_defaults_when_empty() {
        let manager = setup();
        let config = manager.load_schedule_config().unwrap();
        assert_eq!(config, ScheduleConfig::default());
    }

    #[test]
    fn test_overrides_are_applied() {
        let manager = setup();
        manager.set_value(config_keys::DAY_START, "07:30").unwrap();
        manager.set_value(config_keys::LESSON_DURATION_MINUTES, "45").unwrap();
        manager.set_value(config_keys::SCHOOL_DAYS, "FRIDAY, monday").unwrap();

        let config = manager.load_schedule_config().unwrap();
        assert_eq!(config.day_start, NaiveTime::from_hms_opt(7, 30, 0).unwrap());
        assert_eq!(config.lesson_duration_minutes, 45);
        assert_eq!(config.school_days, vec![DayOfWeek::Friday, DayOfWeek::Monday]);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let manager = setup();
        manager.set_value(config_keys::LESSON_DURATION_MINUTES, "abc").unwrap();
        assert!(manager.load_schedule_config().is_err());

        manager.set_value(config_keys::LESSON_DURATION_MINUTES, "0").unwrap();
        assert!(manager.load_schedule_config().is_err());
    }

    #[test]
    fn test_save_then_load_and_snapshot() {
        let manager = setup();
        let config = ScheduleConfig {
            day_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            day_end: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            lesson_duration_minutes: 50,
            school_days: vec![DayOfWeek::Tuesday, DayOfWeek::Thursday],
        };
        manager.save_schedule_config(&config).unwrap();
        assert_eq!(manager.load_schedule_config().unwrap(), config);

        let snapshot = manager.get_config_snapshot().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(parsed[config_keys::SCHOOL_DAYS], "TUESDAY,THURSDAY");
        assert_eq!(parsed[config_keys::DAY_END], "12:00");
    }
}
