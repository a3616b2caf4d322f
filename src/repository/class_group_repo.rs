// ==========================================
// 课表排课系统 - 班级数据仓储
// ==========================================

use crate::domain::school::ClassGroup;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct ClassGroupRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassGroupRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 创建班级
    pub fn create(&self, name: &str) -> RepositoryResult<ClassGroup> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO class_group (name) VALUES (?1)", params![name])?;
        Ok(ClassGroup {
            group_id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    pub fn find_by_id(&self, group_id: i64) -> RepositoryResult<Option<ClassGroup>> {
        let conn = self.get_conn()?;
        let group = conn
            .query_row(
                "SELECT group_id, name FROM class_group WHERE group_id = ?1",
                params![group_id],
                map_row,
            )
            .optional()?;
        Ok(group)
    }

    /// 查询全部班级，按 group_id 升序
    pub fn list_all(&self) -> RepositoryResult<Vec<ClassGroup>> {
        let conn = self.get_conn()?;
        Ok(load_groups(&conn)?)
    }

    pub fn update(&self, group: &ClassGroup) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute(
            "UPDATE class_group SET name = ?1 WHERE group_id = ?2",
            params![group.name, group.group_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::not_found("ClassGroup", group.group_id));
        }
        Ok(())
    }

    pub fn delete(&self, group_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        let affected = conn.execute("DELETE FROM class_group WHERE group_id = ?1", params![group_id])?;

        if affected == 0 {
            return Err(RepositoryError::not_found("ClassGroup", group_id));
        }
        Ok(())
    }
}

pub(crate) fn load_groups(conn: &Connection) -> rusqlite::Result<Vec<ClassGroup>> {
    let mut stmt = conn.prepare("SELECT group_id, name FROM class_group ORDER BY group_id")?;
    let groups = stmt
        .query_map([], map_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(groups)
}

fn map_row(row: &rusqlite::Row) -> rusqlite::Result<ClassGroup> {
    Ok(ClassGroup {
        group_id: row.get(0)?,
        name: row.get(1)?,
    })
}
