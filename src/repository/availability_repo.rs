// ==========================================
// 课表排课系统 - 教师时间约束数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::availability::{Availability, NewAvailability};
use crate::domain::types::{format_time, DayOfWeek};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{get_day, get_kind, get_time};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT availability_id, teacher_id, day_of_week, start_time, end_time, kind, note
    FROM teacher_availability
"#;

// ==========================================
// AvailabilityRepository - 教师时间约束仓储
// ==========================================
pub struct AvailabilityRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AvailabilityRepository {
    /// 创建新的AvailabilityRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建时间约束记录
    ///
    /// # 返回
    /// - `Ok(Availability)`: 带 availability_id 的记录
    /// - `Err`: 教师不存在(外键) / start >= end(检查约束)
    pub fn create(&self, record: &NewAvailability) -> RepositoryResult<Availability> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"INSERT INTO teacher_availability (
                teacher_id, day_of_week, start_time, end_time, kind, note
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            params![
                record.teacher_id,
                record.day.as_str(),
                format_time(record.start_time),
                format_time(record.end_time),
                record.kind.as_str(),
                record.note,
            ],
        )?;

        Ok(record.clone().into_availability(conn.last_insert_rowid()))
    }

    /// 按ID查询
    pub fn find_by_id(&self, availability_id: i64) -> RepositoryResult<Option<Availability>> {
        let conn = self.get_conn()?;

        let record = conn
            .query_row(
                &format!("{} WHERE availability_id = ?1", SELECT_COLUMNS),
                params![availability_id],
                map_row,
            )
            .optional()?;

        Ok(record)
    }

    /// 查询全部记录，按 (teacher_id, availability_id) 排序
    pub fn list_all(&self) -> RepositoryResult<Vec<Availability>> {
        let conn = self.get_conn()?;
        Ok(load_all(&conn)?)
    }

    /// 查询教师的全部记录
    pub fn find_by_teacher(&self, teacher_id: i64) -> RepositoryResult<Vec<Availability>> {
        let conn = self.get_conn()?;
        Ok(load_by_teacher(&conn, teacher_id)?)
    }

    /// 查询教师某天的记录
    pub fn find_by_teacher_and_day(
        &self,
        teacher_id: i64,
        day: DayOfWeek,
    ) -> RepositoryResult<Vec<Availability>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(&format!(
            "{} WHERE teacher_id = ?1 AND day_of_week = ?2 ORDER BY start_time, availability_id",
            SELECT_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![teacher_id, day.as_str()], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    /// 更新记录
    pub fn update(&self, record: &Availability) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"UPDATE teacher_availability
               SET teacher_id = ?1, day_of_week = ?2, start_time = ?3,
                   end_time = ?4, kind = ?5, note = ?6
               WHERE availability_id = ?7"#,
            params![
                record.teacher_id,
                record.day.as_str(),
                format_time(record.start_time),
                format_time(record.end_time),
                record.kind.as_str(),
                record.note,
                record.availability_id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Availability", record.availability_id));
        }
        Ok(())
    }

    /// 删除记录
    pub fn delete(&self, availability_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "DELETE FROM teacher_availability WHERE availability_id = ?1",
            params![availability_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Availability", availability_id));
        }
        Ok(())
    }
}

// ==========================================
// 连接级查询（供排课会话在事务内复用）
// ==========================================

pub(crate) fn load_all(conn: &Connection) -> rusqlite::Result<Vec<Availability>> {
    let mut stmt = conn.prepare(&format!(
        "{} ORDER BY teacher_id, availability_id",
        SELECT_COLUMNS
    ))?;
    let records = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

pub(crate) fn load_by_teacher(conn: &Connection, teacher_id: i64) -> rusqlite::Result<Vec<Availability>> {
    let mut stmt = conn.prepare(&format!(
        "{} WHERE teacher_id = ?1 ORDER BY availability_id",
        SELECT_COLUMNS
    ))?;
    let records = stmt
        .query_map(params![teacher_id], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

/// 映射数据库行到Availability对象
fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Availability> {
    Ok(Availability {
        availability_id: row.get(0)?,
        teacher_id: row.get(1)?,
        day: get_day(row, 2)?,
        start_time: get_time(row, 3)?,
        end_time: get_time(row, 4)?,
        kind: get_kind(row, 5)?,
        note: row.get(6)?,
    })
}
