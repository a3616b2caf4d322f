// ==========================================
// 课表排课系统 - 课时数据仓储
// ==========================================
// 职责: 课时的持久化与按教师/班级/时间段查询
// 红线: Repository 不含业务逻辑，冲突检测由引擎负责
// ==========================================

use crate::domain::lesson::{Lesson, NewLesson};
use crate::domain::types::{format_time, DayOfWeek};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_utils::{get_day, get_time};
use chrono::NaiveTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT lesson_id, subject_id, teacher_id, group_id, day_of_week, start_time, end_time
    FROM lesson
"#;

// 星期按自然顺序排序（day_of_week 为文本列）
const ORDER_BY_WEEK: &str = r#"
    ORDER BY CASE day_of_week
        WHEN 'MONDAY' THEN 1 WHEN 'TUESDAY' THEN 2 WHEN 'WEDNESDAY' THEN 3
        WHEN 'THURSDAY' THEN 4 WHEN 'FRIDAY' THEN 5 WHEN 'SATURDAY' THEN 6
        ELSE 7 END, start_time, lesson_id
"#;

// ==========================================
// LessonRepository - 课时仓储
// ==========================================
pub struct LessonRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LessonRepository {
    /// 创建新的LessonRepository实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 保存课时
    ///
    /// # 返回
    /// - `Ok(Lesson)`: 带 lesson_id 的课时
    /// - `Err`: 学科/教师/班级不存在(外键)
    pub fn save(&self, lesson: &NewLesson) -> RepositoryResult<Lesson> {
        let conn = self.get_conn()?;
        Ok(insert_lesson(&conn, lesson)?)
    }

    /// 按ID查询
    pub fn find_by_id(&self, lesson_id: i64) -> RepositoryResult<Option<Lesson>> {
        let conn = self.get_conn()?;

        let lesson = conn
            .query_row(
                &format!("{} WHERE lesson_id = ?1", SELECT_COLUMNS),
                params![lesson_id],
                map_row,
            )
            .optional()?;

        Ok(lesson)
    }

    /// 查询全部课时（周一到周日、开始时间升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Lesson>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!("{} {}", SELECT_COLUMNS, ORDER_BY_WEEK))?;
        let lessons = stmt
            .query_map([], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lessons)
    }

    /// 查询教师的课表
    pub fn find_by_teacher(&self, teacher_id: i64) -> RepositoryResult<Vec<Lesson>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE teacher_id = ?1 {}",
            SELECT_COLUMNS, ORDER_BY_WEEK
        ))?;
        let lessons = stmt
            .query_map(params![teacher_id], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lessons)
    }

    /// 查询班级的课表
    pub fn find_by_group(&self, group_id: i64) -> RepositoryResult<Vec<Lesson>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE group_id = ?1 {}",
            SELECT_COLUMNS, ORDER_BY_WEEK
        ))?;
        let lessons = stmt
            .query_map(params![group_id], map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lessons)
    }

    /// 查询某天与 [start, end] 相接或相交的课时
    ///
    /// 边界闭合: 结束于 start 或开始于 end 的课时也会返回
    pub fn find_touching(
        &self,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
    ) -> RepositoryResult<Vec<Lesson>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE day_of_week = ?1 AND start_time <= ?3 AND end_time >= ?2 {}",
            SELECT_COLUMNS, ORDER_BY_WEEK
        ))?;
        let lessons = stmt
            .query_map(
                params![day.as_str(), format_time(start), format_time(end)],
                map_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(lessons)
    }

    /// 更新课时
    pub fn update(&self, lesson: &Lesson) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            r#"UPDATE lesson
               SET subject_id = ?1, teacher_id = ?2, group_id = ?3,
                   day_of_week = ?4, start_time = ?5, end_time = ?6
               WHERE lesson_id = ?7"#,
            params![
                lesson.subject_id,
                lesson.teacher_id,
                lesson.group_id,
                lesson.day.as_str(),
                format_time(lesson.start_time),
                format_time(lesson.end_time),
                lesson.lesson_id,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Lesson", lesson.lesson_id));
        }
        Ok(())
    }

    /// 删除课时
    pub fn delete(&self, lesson_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute("DELETE FROM lesson WHERE lesson_id = ?1", params![lesson_id])?;

        if affected == 0 {
            return Err(RepositoryError::not_found("Lesson", lesson_id));
        }
        Ok(())
    }

    /// 清空全部课时
    ///
    /// # 返回
    /// 删除的行数
    pub fn delete_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        Ok(delete_all_lessons(&conn)?)
    }
}

// ==========================================
// 连接级写入（供排课会话在事务内复用）
// ==========================================

pub(crate) fn insert_lesson(conn: &Connection, lesson: &NewLesson) -> rusqlite::Result<Lesson> {
    conn.execute(
        r#"INSERT INTO lesson (
            subject_id, teacher_id, group_id, day_of_week, start_time, end_time
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
        params![
            lesson.subject_id,
            lesson.teacher_id,
            lesson.group_id,
            lesson.day.as_str(),
            format_time(lesson.start_time),
            format_time(lesson.end_time),
        ],
    )?;
    Ok(lesson.clone().into_lesson(conn.last_insert_rowid()))
}

pub(crate) fn delete_all_lessons(conn: &Connection) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM lesson", [])
}

/// 映射数据库行到Lesson对象
fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Lesson> {
    Ok(Lesson {
        lesson_id: row.get(0)?,
        subject_id: row.get(1)?,
        teacher_id: row.get(2)?,
        group_id: row.get(3)?,
        day: get_day(row, 4)?,
        start_time: get_time(row, 5)?,
        end_time: get_time(row, 6)?,
    })
}
