use std::sync::Arc;

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
        entities::Enrollment,
        requests::EnrollStudentRequest,
        responses::ProgressResponse,
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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 一次注册链接出的进度记录数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkStats {
    pub modules_linked: u64,
    pub lessons_linked: u64,
}

/// 学期锁定结果，newly_locked 为 false 表示此前已经锁定
#[derive(Debug, Clone)]
pub struct LockOutcome {
    pub semester: Semester,
    pub newly_locked: bool,
}

/// 成绩单锁定结果，newly_locked 为 false 表示此前已经锁定
#[derive(Debug, Clone)]
pub struct ResultLockOutcome {
    pub result: SemesterResult,
    pub newly_locked: bool,
}

/// 学期成绩聚合结果
#[derive(Debug, Clone)]
pub struct ComputeOutcome {
    pub computed: u64,
    pub skipped_locked: u64,
    pub results: Vec<SemesterResult>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段应已是 argon2 哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数，启动时判断是否需要播种管理员
    async fn count_users(&self) -> Result<u64>;

    /// 课程结构方法
    // 创建届别，标签唯一
    async fn create_cohort(&self, req: CreateCohortRequest) -> Result<Cohort>;
    // 通过ID获取届别
    async fn get_cohort_by_id(&self, id: i64) -> Result<Option<Cohort>>;
    // 列出全部届别
    async fn list_cohorts(&self) -> Result<Vec<Cohort>>;
    // 创建学期
    async fn create_semester(&self, req: CreateSemesterRequest) -> Result<Semester>;
    // 通过ID获取学期
    async fn get_semester_by_id(&self, id: i64) -> Result<Option<Semester>>;
    // 列出学期，可按课程代码过滤
    async fn list_semesters(&self, program_code: Option<String>) -> Result<Vec<Semester>>;
    // 锁定学期（单向，幂等），同时锁定其下全部成绩单
    async fn lock_semester(&self, id: i64, locked_by: i64) -> Result<Option<LockOutcome>>;
    // 创建教学单元
    async fn create_module(&self, semester_id: i64, req: CreateModuleRequest)
    -> Result<ModuleUnit>;
    // 通过ID获取教学单元
    async fn get_module_by_id(&self, id: i64) -> Result<Option<ModuleUnit>>;
    // 按学期列出教学单元
    async fn list_modules_by_semester(&self, semester_id: i64) -> Result<Vec<ModuleUnit>>;
    // 获取教学单元的章节/课时树
    async fn get_module_tree(&self, module_id: i64)
    -> Result<Option<(ModuleUnit, Vec<Chapter>)>>;
    // 创建章节
    async fn create_chapter(&self, module_id: i64, req: CreateChapterRequest) -> Result<Chapter>;
    // 创建课时
    async fn create_lesson(&self, chapter_id: i64, req: CreateLessonRequest) -> Result<Lesson>;
    // 切换课时发布状态
    async fn set_lesson_published(&self, id: i64, published: bool) -> Result<Option<Lesson>>;

    /// 注册与进度方法
    // 注册学生并链接进度记录
    async fn enroll_student(&self, req: EnrollStudentRequest) -> Result<(Enrollment, LinkStats)>;
    // 通过ID获取注册信息
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    // 为已有注册补链进度记录（幂等）
    async fn link_enrollment(&self, enrollment_id: i64) -> Result<LinkStats>;
    // 课时发布后为所有相关注册补链课时进度
    async fn link_published_lesson(&self, lesson_id: i64) -> Result<u64>;
    // 获取注册的进度详情
    async fn get_progress(&self, enrollment_id: i64) -> Result<Option<ProgressResponse>>;
    // 上报课时观看进度
    async fn record_lesson_watch(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        seconds_watched: i64,
        completed: bool,
    ) -> Result<bool>;

    /// 测评与评分方法
    // 创建测评
    async fn create_assignment(
        &self,
        module_id: i64,
        req: CreateAssignmentRequest,
        created_by: i64,
    ) -> Result<Assignment>;
    // 通过ID获取测评
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // 按教学单元列出测评
    async fn list_assignments_by_module(&self, module_id: i64) -> Result<Vec<Assignment>>;
    // 学生提交答案（同一测评重复提交覆盖草稿）
    async fn submit_answer(
        &self,
        assignment_id: i64,
        student_id: i64,
        answer_text: String,
    ) -> Result<Submission>;
    // 按测评列出提交
    async fn list_submissions_by_assignment(&self, assignment_id: i64)
    -> Result<Vec<Submission>>;
    // 评分（score_raw 为 None 时撤销评分），学期锁定后拒绝
    async fn grade_submission(
        &self,
        submission_id: i64,
        grader_id: i64,
        score_raw: Option<f64>,
        feedback: Option<String>,
    ) -> Result<Option<Submission>>;

    /// 学期成绩方法
    // 为学期内注册聚合成绩单（enrollment_ids 为空时全量）
    async fn compute_semester_results(
        &self,
        semester_id: i64,
        enrollment_ids: Vec<i64>,
    ) -> Result<ComputeOutcome>;
    // 锁定单个成绩单（单向，幂等），条件更新防止覆盖第一次锁定
    async fn lock_result(&self, id: i64, locked_by: i64) -> Result<Option<ResultLockOutcome>>;
    // 按学期列出成绩单
    async fn list_results_by_semester(&self, semester_id: i64) -> Result<Vec<SemesterResult>>;
    // 按注册列出成绩单
    async fn list_results_by_enrollment(&self, enrollment_id: i64)
    -> Result<Vec<SemesterResult>>;

    /// 即时通讯方法
    // 创建会话（创建者自动成为成员）
    async fn create_conversation(
        &self,
        creator_id: i64,
        req: CreateConversationRequest,
    ) -> Result<Conversation>;
    // 列出用户参与的会话
    async fn list_conversations_for_user(&self, user_id: i64) -> Result<Vec<Conversation>>;
    // 判断用户是否为会话成员
    async fn is_participant(&self, conversation_id: &str, user_id: i64) -> Result<bool>;
    // 持久化消息（先落库再广播）
    async fn create_message(
        &self,
        conversation_id: &str,
        sender_id: i64,
        text: String,
    ) -> Result<ChatMessage>;
    // 按时间倒序取历史，返回 (正序消息, 是否还有更早的)
    async fn list_messages(
        &self,
        conversation_id: &str,
        before_id: Option<i64>,
        limit: u64,
    ) -> Result<(Vec<ChatMessage>, bool)>;
    // 创建通话会话（init 状态）
    async fn create_call_session(
        &self,
        conversation_id: &str,
        host_id: i64,
    ) -> Result<CallSession>;
    // 通过ID获取通话会话
    async fn get_call_session(&self, id: &str) -> Result<Option<CallSession>>;
    // 通过房间名获取通话会话
    async fn get_call_by_room(&self, room_name: &str) -> Result<Option<CallSession>>;
    // 状态流转：init → live
    async fn start_call(&self, id: &str) -> Result<Option<CallSession>>;
    // 状态流转：init/live → ended
    async fn end_call(&self, id: &str) -> Result<Option<CallSession>>;

    /// 总览统计方法
    // 学生端总览
    async fn student_overview(&self, enrollment_id: i64)
    -> Result<Option<StudentOverviewResponse>>;
    // 校长端总览
    async fn director_overview(&self) -> Result<DirectorOverviewResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
