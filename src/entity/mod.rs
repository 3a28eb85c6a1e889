//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod assignments;
pub mod call_sessions;
pub mod chapters;
pub mod cohorts;
pub mod conversation_participants;
pub mod conversations;
pub mod enrollments;
pub mod lesson_progress;
pub mod lessons;
pub mod messages;
pub mod module_progress;
pub mod modules;
pub mod semester_results;
pub mod semesters;
pub mod submissions;
pub mod users;
