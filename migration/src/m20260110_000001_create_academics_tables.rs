use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建届别（cohort）表
        manager
            .create_table(
                Table::create()
                    .table(Cohorts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cohorts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Cohorts::Label)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Cohorts::StartDate).big_integer().not_null())
                    .col(ColumnDef::new(Cohorts::EndDate).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学期表（含锁定字段）
        manager
            .create_table(
                Table::create()
                    .table(Semesters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Semesters::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Semesters::ProgramCode).string().not_null())
                    .col(ColumnDef::new(Semesters::CohortId).big_integer().not_null())
                    .col(ColumnDef::new(Semesters::Name).string().not_null())
                    .col(
                        ColumnDef::new(Semesters::SortOrder)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Semesters::EctsTarget)
                            .integer()
                            .not_null()
                            .default(30),
                    )
                    .col(
                        ColumnDef::new(Semesters::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Semesters::LockedAt).big_integer().null())
                    .col(ColumnDef::new(Semesters::LockedBy).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Semesters::Table, Semesters::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 同一课程/届别下学期名唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_semesters_program_cohort_name")
                    .table(Semesters::Table)
                    .col(Semesters::ProgramCode)
                    .col(Semesters::CohortId)
                    .col(Semesters::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建教学单元（UE）表
        manager
            .create_table(
                Table::create()
                    .table(Modules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Modules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Modules::SemesterId).big_integer().not_null())
                    .col(ColumnDef::new(Modules::Code).string().not_null())
                    .col(ColumnDef::new(Modules::Title).string().not_null())
                    .col(
                        ColumnDef::new(Modules::Coefficient)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(Modules::Credits)
                            .double()
                            .not_null()
                            .default(6.0),
                    )
                    .col(
                        ColumnDef::new(Modules::SortOrder)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Modules::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Modules::Table, Modules::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_modules_semester_code")
                    .table(Modules::Table)
                    .col(Modules::SemesterId)
                    .col(Modules::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建章节表
        manager
            .create_table(
                Table::create()
                    .table(Chapters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Chapters::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Chapters::ModuleId).big_integer().not_null())
                    .col(ColumnDef::new(Chapters::Title).string().not_null())
                    .col(
                        ColumnDef::new(Chapters::SortOrder)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Chapters::Table, Chapters::ModuleId)
                            .to(Modules::Table, Modules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课时表
        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lessons::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lessons::ChapterId).big_integer().not_null())
                    .col(ColumnDef::new(Lessons::Title).string().not_null())
                    .col(
                        ColumnDef::new(Lessons::SortOrder)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Lessons::DurationSeconds)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Lessons::ExternalUrl).string().null())
                    .col(
                        ColumnDef::new(Lessons::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lessons::Table, Lessons::ChapterId)
                            .to(Chapters::Table, Chapters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建注册（enrollment）表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::ProgramCode)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CohortId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Enrollments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::CohortId)
                            .to(Cohorts::Table, Cohorts::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_enrollments_student_program_cohort")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::ProgramCode)
                    .col(Enrollments::CohortId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建模块进度表，(enrollment, module) 唯一约束是链接幂等性的根基
        manager
            .create_table(
                Table::create()
                    .table(ModuleProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModuleProgress::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ModuleProgress::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModuleProgress::ModuleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ModuleProgress::Percent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ModuleProgress::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ModuleProgress::Table, ModuleProgress::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ModuleProgress::Table, ModuleProgress::ModuleId)
                            .to(Modules::Table, Modules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_module_progress_enrollment_module")
                    .table(ModuleProgress::Table)
                    .col(ModuleProgress::EnrollmentId)
                    .col(ModuleProgress::ModuleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建课时进度表
        manager
            .create_table(
                Table::create()
                    .table(LessonProgress::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LessonProgress::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LessonProgress::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LessonProgress::LessonId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LessonProgress::CompletedAt).big_integer().null())
                    .col(
                        ColumnDef::new(LessonProgress::SecondsWatched)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LessonProgress::Table, LessonProgress::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LessonProgress::Table, LessonProgress::LessonId)
                            .to(Lessons::Table, Lessons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_lesson_progress_enrollment_lesson")
                    .table(LessonProgress::Table)
                    .col(LessonProgress::EnrollmentId)
                    .col(LessonProgress::LessonId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建作业/测评表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Assignments::ModuleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Assignments::Kind).string().not_null())
                    .col(ColumnDef::new(Assignments::EvalKind).string().not_null())
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(
                        ColumnDef::new(Assignments::TotalPoints)
                            .double()
                            .not_null()
                            .default(20.0),
                    )
                    .col(
                        ColumnDef::new(Assignments::Coefficient)
                            .double()
                            .not_null()
                            .default(1.0),
                    )
                    .col(
                        ColumnDef::new(Assignments::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Assignments::CreatedBy).big_integer().null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::ModuleId)
                            .to(Modules::Table, Modules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建提交表，(assignment, student) 唯一
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(ColumnDef::new(Submissions::AnswerText).text().null())
                    .col(ColumnDef::new(Submissions::SubmittedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::ScoreRaw).double().null())
                    .col(ColumnDef::new(Submissions::Note20).double().null())
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建学期成绩表，(enrollment, semester) 唯一
        manager
            .create_table(
                Table::create()
                    .table(SemesterResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SemesterResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SemesterResults::EnrollmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SemesterResults::SemesterId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SemesterResults::Average20).double().null())
                    .col(
                        ColumnDef::new(SemesterResults::CreditsEarned)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(SemesterResults::Decision).string().null())
                    .col(
                        ColumnDef::new(SemesterResults::IsLocked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SemesterResults::LockedAt).big_integer().null())
                    .col(ColumnDef::new(SemesterResults::LockedBy).big_integer().null())
                    .col(
                        ColumnDef::new(SemesterResults::ComputedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SemesterResults::Table, SemesterResults::EnrollmentId)
                            .to(Enrollments::Table, Enrollments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SemesterResults::Table, SemesterResults::SemesterId)
                            .to(Semesters::Table, Semesters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_semester_results_enrollment_semester")
                    .table(SemesterResults::Table)
                    .col(SemesterResults::EnrollmentId)
                    .col(SemesterResults::SemesterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_student_id")
                    .table(Submissions::Table)
                    .col(Submissions::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(SemesterResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LessonProgress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ModuleProgress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Chapters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Modules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Semesters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cohorts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Cohorts {
    #[sea_orm(iden = "cohorts")]
    Table,
    Id,
    Label,
    StartDate,
    EndDate,
}

#[derive(DeriveIden)]
enum Semesters {
    #[sea_orm(iden = "semesters")]
    Table,
    Id,
    ProgramCode,
    CohortId,
    Name,
    SortOrder,
    EctsTarget,
    IsLocked,
    LockedAt,
    LockedBy,
}

#[derive(DeriveIden)]
enum Modules {
    #[sea_orm(iden = "modules")]
    Table,
    Id,
    SemesterId,
    Code,
    Title,
    Coefficient,
    Credits,
    SortOrder,
    IsActive,
}

#[derive(DeriveIden)]
enum Chapters {
    #[sea_orm(iden = "chapters")]
    Table,
    Id,
    ModuleId,
    Title,
    SortOrder,
}

#[derive(DeriveIden)]
enum Lessons {
    #[sea_orm(iden = "lessons")]
    Table,
    Id,
    ChapterId,
    Title,
    SortOrder,
    DurationSeconds,
    ExternalUrl,
    IsPublished,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    ProgramCode,
    CohortId,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ModuleProgress {
    #[sea_orm(iden = "module_progress")]
    Table,
    Id,
    EnrollmentId,
    ModuleId,
    Percent,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LessonProgress {
    #[sea_orm(iden = "lesson_progress")]
    Table,
    Id,
    EnrollmentId,
    LessonId,
    CompletedAt,
    SecondsWatched,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    ModuleId,
    Kind,
    EvalKind,
    Title,
    Description,
    TotalPoints,
    Coefficient,
    IsPublished,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Status,
    AnswerText,
    SubmittedAt,
    ScoreRaw,
    #[sea_orm(iden = "note_20")]
    Note20,
    GradedBy,
    GradedAt,
    Feedback,
}

#[derive(DeriveIden)]
enum SemesterResults {
    #[sea_orm(iden = "semester_results")]
    Table,
    Id,
    EnrollmentId,
    SemesterId,
    #[sea_orm(iden = "average_20")]
    Average20,
    CreditsEarned,
    Decision,
    IsLocked,
    LockedAt,
    LockedBy,
    ComputedAt,
}
