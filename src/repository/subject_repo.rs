// ==========================================
// 课表排课系统 - 学科数据仓储
// ==========================================

use crate::domain::school::Subject;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::get_u32;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct SubjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SubjectRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建学科
    ///
    /// # 参数
    /// - name: 学科名称 (唯一)
    /// - weekly_lessons: 每个班级每周课时数 (> 0，由表检查约束兜底)
    pub fn create(&self, name: &str, weekly_lessons: u32) -> RepositoryResult<Subject> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO subject (name, weekly_lessons) VALUES (?1, ?2)",
            params![name, weekly_lessons],
        )?;

        Ok(Subject {
            subject_id: conn.last_insert_rowid(),
            name: name.to_string(),
            weekly_lessons,
        })
    }

    pub fn find_by_id(&self, subject_id: i64) -> RepositoryResult<Option<Subject>> {
        let conn = self.get_conn()?;
        let subject = conn
            .query_row(
                "SELECT subject_id, name, weekly_lessons FROM subject WHERE subject_id = ?1",
                params![subject_id],
                map_row,
            )
            .optional()?;
        Ok(subject)
    }

    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Subject>> {
        let conn = self.get_conn()?;
        let subject = conn
            .query_row(
                "SELECT subject_id, name, weekly_lessons FROM subject WHERE name = ?1",
                params![name],
                map_row,
            )
            .optional()?;
        Ok(subject)
    }

    /// 查询全部学科，按 subject_id 升序
    pub fn list_all(&self) -> RepositoryResult<Vec<Subject>> {
        let conn = self.get_conn()?;
        Ok(load_subjects(&conn)?)
    }

    pub fn update(&self, subject: &Subject) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE subject SET name = ?1, weekly_lessons = ?2 WHERE subject_id = ?3",
            params![subject.name, subject.weekly_lessons, subject.subject_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Subject", subject.subject_id));
        }
        Ok(())
    }

    pub fn delete(&self, subject_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute("DELETE FROM subject WHERE subject_id = ?1", params![subject_id])?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Subject", subject_id));
        }
        Ok(())
    }
}

pub(crate) fn load_subjects(conn: &Connection) -> rusqlite::Result<Vec<Subject>> {
    let mut stmt =
        conn.prepare("SELECT subject_id, name, weekly_lessons FROM subject ORDER BY subject_id")?;
    let subjects = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(subjects)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Subject> {
    Ok(Subject {
        subject_id: row.get(0)?,
        name: row.get(1)?,
        weekly_lessons: get_u32(row, 2)?,
    })
}
