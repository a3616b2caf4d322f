// ==========================================
// 课表排课系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{LessonApi, SchoolApi};
use crate::config::config_manager::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::generator::ScheduleGenerator;
use crate::repository::{
    AvailabilityRepository, ClassGroupRepository, LessonRepository, SqliteScheduleStore,
    SubjectRepository, TeacherRepository,
};

/// 应用状态
///
/// 包含所有API实例和共享资源，所有仓储共用一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 主数据API
    pub school_api: Arc<SchoolApi>,

    /// 课时与排课API
    pub lesson_api: Arc<LessonApi>,

    /// 排课参数管理
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 1. 打开数据库并初始化 schema
    /// 2. 从 config_kv 读取排课参数
    /// 3. 初始化 Repository、排课生成器与 API
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("无法初始化数据库schema: {}", e))?;
        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 基于已初始化 schema 的共享连接创建
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        // ==========================================
        // 配置
        // ==========================================
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let schedule_config = config_manager
            .load_schedule_config()
            .map_err(|e| format!("无法加载排课参数: {}", e))?;

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let teacher_repo = Arc::new(TeacherRepository::new(conn.clone()));
        let subject_repo = Arc::new(SubjectRepository::new(conn.clone()));
        let group_repo = Arc::new(ClassGroupRepository::new(conn.clone()));
        let availability_repo = Arc::new(AvailabilityRepository::new(conn.clone()));
        let lesson_repo = Arc::new(LessonRepository::new(conn.clone()));

        // ==========================================
        // 初始化Engine层
        // ==========================================
        let store = Arc::new(SqliteScheduleStore::new(conn));
        let generator = Arc::new(
            ScheduleGenerator::new(store, schedule_config)
                .map_err(|e| format!("无法创建排课生成器: {}", e))?,
        );

        // ==========================================
        // 初始化API层
        // ==========================================
        let school_api = Arc::new(SchoolApi::new(
            teacher_repo.clone(),
            subject_repo.clone(),
            group_repo.clone(),
            availability_repo,
        ));
        let lesson_api = Arc::new(LessonApi::new(
            lesson_repo,
            teacher_repo,
            subject_repo,
            group_repo,
            generator,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            school_api,
            lesson_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先使用环境变量 LESSON_SCHEDULER_DB_PATH，否则放在用户数据目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("LESSON_SCHEDULER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./lesson_scheduler.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("lesson-scheduler");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("lesson_scheduler.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_on_in_memory_db() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let state = AppState::from_connection(":memory:".to_string(), Arc::new(Mutex::new(conn))).unwrap();

        assert!(state.school_api.list_teachers().unwrap().is_empty());
        let report = state.lesson_api.generate_schedule().unwrap();
        assert_eq!(report.required_total, 0);
    }
}
