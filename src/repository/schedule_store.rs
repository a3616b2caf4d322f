// ==========================================
// 课表排课系统 - SQLite 排课存储
// ==========================================
// 职责: 为排课引擎提供事务作用域 (BEGIN IMMEDIATE)
// 说明: 其他进程的写入在 busy_timeout 内等待，不会与本轮排课交错
// ==========================================

use crate::domain::lesson::{Lesson, NewLesson};
use crate::domain::school::{ClassGroup, Subject};
use crate::domain::teacher::Teacher;
use crate::engine::store::{ScheduleSession, ScheduleStore};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{class_group_repo, lesson_repo, subject_repo, teacher_repo};
use rusqlite::{Connection, TransactionBehavior};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

// ==========================================
// SqliteScheduleStore
// ==========================================
pub struct SqliteScheduleStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteScheduleStore {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn with_transaction<R, F>(&self, f: F) -> RepositoryResult<R>
    where
        F: FnOnce(&dyn ScheduleSession) -> RepositoryResult<R>,
    {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let session = SqliteScheduleSession { conn: &*tx };
        match f(&session) {
            Ok(value) => {
                tx.commit()
                    .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
                debug!("排课事务已提交");
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "排课事务回滚");
                // Transaction 在 drop 时也会回滚，这里显式回滚以便报告失败
                if let Err(rollback_err) = tx.rollback() {
                    warn!(error = %rollback_err, "回滚失败");
                }
                Err(err)
            }
        }
    }
}

// ==========================================
// SqliteScheduleSession - 事务内会话
// ==========================================
pub struct SqliteScheduleSession<'a> {
    conn: &'a Connection,
}

impl ScheduleSession for SqliteScheduleSession<'_> {
    fn list_teachers(&self) -> RepositoryResult<Vec<Teacher>> {
        Ok(teacher_repo::load_teachers(self.conn)?)
    }

    fn list_subjects(&self) -> RepositoryResult<Vec<Subject>> {
        Ok(subject_repo::load_subjects(self.conn)?)
    }

    fn list_groups(&self) -> RepositoryResult<Vec<ClassGroup>> {
        Ok(class_group_repo::load_groups(self.conn)?)
    }

    fn delete_all_lessons(&self) -> RepositoryResult<usize> {
        Ok(lesson_repo::delete_all_lessons(self.conn)?)
    }

    fn save_lesson(&self, lesson: &NewLesson) -> RepositoryResult<Lesson> {
        Ok(lesson_repo::insert_lesson(self.conn, lesson)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::domain::types::DayOfWeek;
    use chrono::NaiveTime;

    fn setup() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO teacher (name, email) VALUES ('Ana', 'ana@school.test');
            INSERT INTO subject (name, weekly_lessons) VALUES ('Math', 2);
            INSERT INTO class_group (name) VALUES ('1A');
            INSERT INTO teacher_subject (teacher_id, subject_id) VALUES (1, 1);
            "#,
        )
        .unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn new_lesson(start_h: u32) -> NewLesson {
        NewLesson {
            subject_id: 1,
            teacher_id: 1,
            group_id: 1,
            day: DayOfWeek::Monday,
            start_time: NaiveTime::from_hms_opt(start_h, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(start_h + 1, 0, 0).unwrap(),
        }
    }

    fn lesson_count(conn: &Arc<Mutex<Connection>>) -> i64 {
        conn.lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM lesson", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_commit_on_ok() {
        let conn = setup();
        let store = SqliteScheduleStore::new(conn.clone());

        let saved = store
            .with_transaction(|session| {
                assert_eq!(session.list_teachers()?[0].subject_ids, vec![1]);
                session.save_lesson(&new_lesson(8))
            })
            .unwrap();

        assert!(saved.lesson_id > 0);
        assert_eq!(lesson_count(&conn), 1);
    }

    #[test]
    fn test_rollback_on_err() {
        let conn = setup();
        let store = SqliteScheduleStore::new(conn.clone());

        let result: RepositoryResult<()> = store.with_transaction(|session| {
            session.save_lesson(&new_lesson(8))?;
            // 不存在的班级触发外键失败
            let mut bad = new_lesson(9);
            bad.group_id = 99;
            session.save_lesson(&bad)?;
            Ok(())
        });

        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
        assert_eq!(lesson_count(&conn), 0);
    }

    #[test]
    fn test_delete_all_inside_transaction() {
        let conn = setup();
        let store = SqliteScheduleStore::new(conn.clone());
        store
            .with_transaction(|session| {
                session.save_lesson(&new_lesson(8))?;
                session.save_lesson(&new_lesson(9))
            })
            .unwrap();

        let deleted = store.with_transaction(|session| session.delete_all_lessons()).unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(lesson_count(&conn), 0);
    }
}
