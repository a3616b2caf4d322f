// ==========================================
// 课表排课系统 - 教师数据仓储
// ==========================================
// 职责: 教师主数据 + 教师-学科资格关联
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::teacher::Teacher;
use crate::repository::availability_repo;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// ==========================================
// TeacherRepository - 教师仓储
// ==========================================
pub struct TeacherRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TeacherRepository {
    /// 创建新的TeacherRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建教师（不含学科与时间约束）
    ///
    /// # 参数
    /// - name: 教师姓名
    /// - email: 邮箱 (唯一)
    pub fn create(&self, name: &str, email: &str) -> RepositoryResult<Teacher> {
        let conn = self.get_conn()?;

        conn.execute(
            "INSERT INTO teacher (name, email) VALUES (?1, ?2)",
            params![name, email],
        )?;

        Ok(Teacher {
            teacher_id: conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            subject_ids: Vec::new(),
            availabilities: Vec::new(),
        })
    }

    /// 按ID查询（含学科与时间约束）
    pub fn find_by_id(&self, teacher_id: i64) -> RepositoryResult<Option<Teacher>> {
        let conn = self.get_conn()?;

        let head = conn
            .query_row(
                "SELECT teacher_id, name, email FROM teacher WHERE teacher_id = ?1",
                params![teacher_id],
                map_head,
            )
            .optional()?;

        let Some(mut teacher) = head else {
            return Ok(None);
        };

        teacher.subject_ids = load_subject_ids(&conn, teacher_id)?;
        teacher.availabilities = availability_repo::load_by_teacher(&conn, teacher_id)?;
        Ok(Some(teacher))
    }

    /// 查询全部教师，按 teacher_id 升序
    pub fn list_all(&self) -> RepositoryResult<Vec<Teacher>> {
        let conn = self.get_conn()?;
        Ok(load_teachers(&conn)?)
    }

    /// 查询可教授某学科的教师，按 teacher_id 升序
    pub fn find_by_subject(&self, subject_id: i64) -> RepositoryResult<Vec<Teacher>> {
        let conn = self.get_conn()?;
        let teachers = load_teachers(&conn)?
            .into_iter()
            .filter(|t| t.is_qualified_for(subject_id))
            .collect();
        Ok(teachers)
    }

    /// 更新教师基本信息
    pub fn update(&self, teacher_id: i64, name: &str, email: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE teacher SET name = ?1, email = ?2 WHERE teacher_id = ?3",
            params![name, email, teacher_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Teacher", teacher_id));
        }
        Ok(())
    }

    /// 删除教师（级联删除资格、时间约束与课时）
    pub fn delete(&self, teacher_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "DELETE FROM teacher WHERE teacher_id = ?1",
            params![teacher_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Teacher", teacher_id));
        }
        Ok(())
    }

    /// 是否存在
    pub fn exists(&self, teacher_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let found = conn
            .query_row(
                "SELECT 1 FROM teacher WHERE teacher_id = ?1",
                params![teacher_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// 授予学科资格（已存在则忽略）
    pub fn assign_subject(&self, teacher_id: i64, subject_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT OR IGNORE INTO teacher_subject (teacher_id, subject_id) VALUES (?1, ?2)",
            params![teacher_id, subject_id],
        )?;
        Ok(())
    }

    /// 撤销学科资格
    ///
    /// # 返回
    /// - `Ok(true)`: 已撤销
    /// - `Ok(false)`: 原本就没有该资格
    pub fn remove_subject(&self, teacher_id: i64, subject_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM teacher_subject WHERE teacher_id = ?1 AND subject_id = ?2",
            params![teacher_id, subject_id],
        )?;
        Ok(affected > 0)
    }
}

// ==========================================
// 连接级查询（供排课会话在事务内复用）
// ==========================================

/// 加载全部教师，含学科资格(升序)与时间约束
pub(crate) fn load_teachers(conn: &Connection) -> rusqlite::Result<Vec<Teacher>> {
    let mut stmt = conn.prepare("SELECT teacher_id, name, email FROM teacher ORDER BY teacher_id")?;
    let mut teachers = stmt
        .query_map([], map_head)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let mut subjects: HashMap<i64, Vec<i64>> = HashMap::new();
    let mut stmt = conn.prepare(
        "SELECT teacher_id, subject_id FROM teacher_subject ORDER BY teacher_id, subject_id",
    )?;
    let pairs = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;
    for pair in pairs {
        let (teacher_id, subject_id) = pair?;
        subjects.entry(teacher_id).or_default().push(subject_id);
    }

    let mut availabilities: HashMap<i64, Vec<_>> = HashMap::new();
    for record in availability_repo::load_all(conn)? {
        availabilities.entry(record.teacher_id).or_default().push(record);
    }

    for teacher in teachers.iter_mut() {
        teacher.subject_ids = subjects.remove(&teacher.teacher_id).unwrap_or_default();
        teacher.availabilities = availabilities.remove(&teacher.teacher_id).unwrap_or_default();
    }

    Ok(teachers)
}

fn load_subject_ids(conn: &Connection, teacher_id: i64) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT subject_id FROM teacher_subject WHERE teacher_id = ?1 ORDER BY subject_id",
    )?;
    let ids = stmt
        .query_map(params![teacher_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<i64>>>()?;
    Ok(ids)
}

/// 映射教师主表行（关联数据另行装配）
fn map_head(row: &rusqlite::Row) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        teacher_id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        subject_ids: Vec::new(),
        availabilities: Vec::new(),
    })
}
