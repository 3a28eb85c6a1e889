//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::call_sessions::{
    ActiveModel as CallSessionActiveModel, Entity as CallSessions, Model as CallSessionModel,
};
pub use super::chapters::{
    ActiveModel as ChapterActiveModel, Entity as Chapters, Model as ChapterModel,
};
pub use super::cohorts::{ActiveModel as CohortActiveModel, Entity as Cohorts, Model as CohortModel};
pub use super::conversation_participants::{
    ActiveModel as ConversationParticipantActiveModel, Entity as ConversationParticipants,
    Model as ConversationParticipantModel,
};
pub use super::conversations::{
    ActiveModel as ConversationActiveModel, Entity as Conversations, Model as ConversationModel,
};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::lesson_progress::{
    ActiveModel as LessonProgressActiveModel, Entity as LessonProgress,
    Model as LessonProgressModel,
};
pub use super::lessons::{ActiveModel as LessonActiveModel, Entity as Lessons, Model as LessonModel};
pub use super::messages::{
    ActiveModel as MessageActiveModel, Entity as Messages, Model as MessageModel,
};
pub use super::module_progress::{
    ActiveModel as ModuleProgressActiveModel, Entity as ModuleProgress,
    Model as ModuleProgressModel,
};
pub use super::modules::{ActiveModel as ModuleActiveModel, Entity as Modules, Model as ModuleModel};
pub use super::semester_results::{
    ActiveModel as SemesterResultActiveModel, Entity as SemesterResults,
    Model as SemesterResultModel,
};
pub use super::semesters::{
    ActiveModel as SemesterActiveModel, Entity as Semesters, Model as SemesterModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
