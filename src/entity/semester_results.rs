//! 学期成绩实体，(enrollment, semester) 唯一

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "semester_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub enrollment_id: i64,
    pub semester_id: i64,
    pub average_20: Option<f64>,
    pub credits_earned: f64,
    pub decision: Option<String>,
    pub is_locked: bool,
    pub locked_at: Option<i64>,
    pub locked_by: Option<i64>,
    pub computed_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::enrollments::Entity",
        from = "Column::EnrollmentId",
        to = "super::enrollments::Column::Id"
    )]
    Enrollment,
    #[sea_orm(
        belongs_to = "super::semesters::Entity",
        from = "Column::SemesterId",
        to = "super::semesters::Column::Id"
    )]
    Semester,
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::semesters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semester.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_result(self) -> crate::models::results::entities::SemesterResult {
        use crate::models::results::entities::{Decision, SemesterResult};
        use chrono::{DateTime, Utc};

        SemesterResult {
            id: self.id,
            enrollment_id: self.enrollment_id,
            semester_id: self.semester_id,
            average_20: self.average_20,
            credits_earned: self.credits_earned,
            decision: self.decision.and_then(|d| d.parse::<Decision>().ok()),
            is_locked: self.is_locked,
            locked_at: self
                .locked_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            locked_by: self.locked_by,
            computed_at: self
                .computed_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
        }
    }
}
