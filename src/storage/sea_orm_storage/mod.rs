//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod curriculum;
mod dashboard;
mod enrollments;
mod messenger;
mod results;
mod submissions;
mod users;

use crate::config::AppConfig;
use crate::errors::{CampusError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CampusError::database_operation(format!("Migration failed: {e}")))?;

        info!("SeaORM storage initialized, database: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CampusError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("SQLite connect failed: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CampusError::database_connection(format!("Database connect failed: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CampusError::database_config(format!(
                "Cannot infer database type from URL: {url}. Supported: sqlite://, postgres://, mysql://, or a .db/.sqlite path"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    curriculum::{
        entities::{Chapter, Cohort, Lesson, ModuleUnit, Semester},
        requests::{
            CreateChapterRequest, CreateCohortRequest, CreateLessonRequest, CreateModuleRequest,
            CreateSemesterRequest,
        },
    },
    dashboard::responses::{DirectorOverviewResponse, StudentOverviewResponse},
    enrollments::{
        entities::Enrollment, requests::EnrollStudentRequest, responses::ProgressResponse,
    },
    messenger::{
        entities::{CallSession, ChatMessage, Conversation},
        requests::CreateConversationRequest,
    },
    results::entities::SemesterResult,
    submissions::{
        entities::{Assignment, Submission},
        requests::CreateAssignmentRequest,
    },
    users::{entities::User, requests::CreateUserRequest},
};
use crate::storage::{ComputeOutcome, LinkStats, LockOutcome, ResultLockOutcome, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程结构模块
    async fn create_cohort(&self, req: CreateCohortRequest) -> Result<Cohort> {
        self.create_cohort_impl(req).await
    }

    async fn get_cohort_by_id(&self, id: i64) -> Result<Option<Cohort>> {
        self.get_cohort_by_id_impl(id).await
    }

    async fn list_cohorts(&self) -> Result<Vec<Cohort>> {
        self.list_cohorts_impl().await
    }

    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester> {
        self.create_semester_impl(req).await
    }

    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>> {
        self.get_semester_by_id_impl(id).await
    }

    async fn list_semesters(&self, program_code: Option<String>) -> Result<Vec<Semester>> {
        self.list_semesters_impl(program_code).await
    }

    async fn lock_semester(&self, id: i64, locked_by: i64) -> Result<Option<LockOutcome>> {
        self.lock_semester_impl(id, locked_by).await
    }

    async fn create_module(
        &self,
        semester_id: i64,
        req: CreateModuleRequest,
    ) -> Result<ModuleUnit> {
        self.create_module_impl(semester_id, req).await
    }

    async fn get_module_by_id(&self, id: i64) -> Result<Option<ModuleUnit>> {
        self.get_module_by_id_impl(id).await
    }

    async fn list_modules_by_semester(&self, semester_id: i64) -> Result<Vec<ModuleUnit>> {
        self.list_modules_by_semester_impl(semester_id).await
    }

    async fn get_module_tree(
        &self,
        module_id: i64,
    ) -> Result<Option<(ModuleUnit, Vec<Chapter>)>> {
        self.get_module_tree_impl(module_id).await
    }

    async fn create_chapter(&self, module_id: i64, req: CreateChapterRequest) -> Result<Chapter> {
        self.create_chapter_impl(module_id, req).await
    }

    async fn create_lesson(&self, chapter_id: i64, req: CreateLessonRequest) -> Result<Lesson> {
        self.create_lesson_impl(chapter_id, req).await
    }

    async fn set_lesson_published(&self, id: i64, published: bool) -> Result<Option<Lesson>> {
        self.set_lesson_published_impl(id, published).await
    }

    // 注册与进度模块
    async fn enroll_student(&self, req: EnrollStudentRequest) -> Result<(Enrollment, LinkStats)> {
        self.enroll_student_impl(req).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn link_enrollment(&self, enrollment_id: i64) -> Result<LinkStats> {
        self.link_enrollment_impl(enrollment_id).await
    }

    async fn link_published_lesson(&self, lesson_id: i64) -> Result<u64> {
        self.link_published_lesson_impl(lesson_id).await
    }

    async fn get_progress(&self, enrollment_id: i64) -> Result<Option<ProgressResponse>> {
        self.get_progress_impl(enrollment_id).await
    }

    async fn record_lesson_watch(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        seconds_watched: i64,
        completed: bool,
    ) -> Result<bool> {
        self.record_lesson_watch_impl(enrollment_id, lesson_id, seconds_watched, completed)
            .await
    }

    // 测评与评分模块
    async fn create_assignment(
        &self,
        module_id: i64,
        req: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment> {
        self.create_assignment_impl(module_id, req, created_by)
            .await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_by_module(&self, module_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_by_module_impl(module_id).await
    }

    async fn submit_answer(
        &self,
        assignment_id: i64,
        student_id: i64,
        answer_text: String,
    ) -> Result<Submission> {
        self.submit_answer_impl(assignment_id, student_id, answer_text)
            .await
    }

    async fn list_submissions_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        self.list_submissions_by_assignment_impl(assignment_id)
            .await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        grader_id: i64,
        score_raw: Option<f64>,
        feedback: Option<String>,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(submission_id, grader_id, score_raw, feedback)
            .await
    }

    // 学期成绩模块
    async fn compute_semester_results(
        &self,
        semester_id: i64,
        enrollment_ids: Vec<i64>,
    ) -> Result<ComputeOutcome> {
        self.compute_semester_results_impl(semester_id, enrollment_ids)
            .await
    }

    async fn lock_result(&self, id: i64, locked_by: i64) -> Result<Option<ResultLockOutcome>> {
        self.lock_result_impl(id, locked_by).await
    }

    async fn list_results_by_semester(&self, semester_id: i64) -> Result<Vec<SemesterResult>> {
        self.list_results_by_semester_impl(semester_id).await
    }

    async fn list_results_by_enrollment(
        &self,
        enrollment_id: i64,
    ) -> Result<Vec<SemesterResult>> {
        self.list_results_by_enrollment_impl(enrollment_id).await
    }

    // 即时通讯模块
    async fn create_conversation(
        &self,
        creator_id: i64,
        req: CreateConversationRequest,
    ) -> Result<Conversation> {
        self.create_conversation_impl(creator_id, req).await
    }

    async fn list_conversations_for_user(&self, user_id: i64) -> Result<Vec<Conversation>> {
        self.list_conversations_for_user_impl(user_id).await
    }

    async fn is_participant(&self, conversation_id: &str, user_id: i64) -> Result<bool> {
        self.is_participant_impl(conversation_id, user_id).await
    }

    async fn create_message(
        &self,
        conversation_id: &str,
        sender_id: i64,
        text: String,
    ) -> Result<ChatMessage> {
        self.create_message_impl(conversation_id, sender_id, text)
            .await
    }

    async fn list_messages(
        &self,
        conversation_id: &str,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<(Vec<ChatMessage>, bool)> {
        self.list_messages_impl(conversation_id, before_id, limit)
            .await
    }

    async fn create_call_session(
        &self,
        conversation_id: &str,
        host_id: i64,
    ) -> Result<CallSession> {
        self.create_call_session_impl(conversation_id, host_id)
            .await
    }

    async fn get_call_session(&self, id: &str) -> Result<Option<CallSession>> {
        self.get_call_session_impl(id).await
    }

    async fn get_call_by_room(&self, room_name: &str) -> Result<Option<CallSession>> {
        self.get_call_by_room_impl(room_name).await
    }

    async fn start_call(&self, id: &str) -> Result<Option<CallSession>> {
        self.start_call_impl(id).await
    }

    async fn end_call(&self, id: &str) -> Result<Option<CallSession>> {
        self.end_call_impl(id).await
    }

    // 总览统计模块
    async fn student_overview(
        &self,
        enrollment_id: i64,
    ) -> Result<Option<StudentOverviewResponse>> {
        self.student_overview_impl(enrollment_id).await
    }

    async fn director_overview(&self) -> Result<DirectorOverviewResponse> {
        self.director_overview_impl().await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::curriculum::requests::{CreateCohortRequest, CreateSemesterRequest};
    use crate::models::enrollments::requests::EnrollStudentRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    /// 内存 SQLite 存储，单连接保证库在测试期间不被回收
    pub async fn memory_storage() -> SeaOrmStorage {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .expect("connect to in-memory sqlite");
        Migrator::up(&db, None).await.expect("run migrations");
        SeaOrmStorage { db }
    }

    /// 播种一个学生、届别、学期和对应注册，返回 (semester_id, enrollment_id)
    pub async fn seed_semester_with_enrollment(storage: &SeaOrmStorage) -> (i64, i64) {
        let student = storage
            .create_user_impl(CreateUserRequest {
                username: "aminata".to_string(),
                email: "aminata@esfe-mali.edu.ml".to_string(),
                password: "not-a-real-hash".to_string(),
                role: UserRole::Student,
                display_name: None,
            })
            .await
            .expect("seed student");

        let cohort = storage
            .create_cohort_impl(CreateCohortRequest {
                label: "2025-2027".to_string(),
                start_date: chrono::Utc::now(),
                end_date: chrono::Utc::now() + chrono::Duration::days(730),
            })
            .await
            .expect("seed cohort");

        let semester = storage
            .create_semester_impl(CreateSemesterRequest {
                program_code: "MRH".to_string(),
                cohort_id: cohort.id,
                name: "Semestre 1".to_string(),
                sort_order: 1,
                ects_target: 30,
            })
            .await
            .expect("seed semester");

        let (enrollment, _) = storage
            .enroll_student_impl(EnrollStudentRequest {
                student_id: student.id,
                program_code: "MRH".to_string(),
                cohort_id: cohort.id,
            })
            .await
            .expect("seed enrollment");

        (semester.id, enrollment.id)
    }
}
