//! 学期实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "semesters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub program_code: String,
    pub cohort_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub ects_target: i32,
    pub is_locked: bool,
    pub locked_at: Option<i64>,
    pub locked_by: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cohorts::Entity",
        from = "Column::CohortId",
        to = "super::cohorts::Column::Id"
    )]
    Cohort,
    #[sea_orm(has_many = "super::modules::Entity")]
    Modules,
    #[sea_orm(has_many = "super::semester_results::Entity")]
    SemesterResults,
}

impl Related<super::cohorts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cohort.def()
    }
}

impl Related<super::modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Modules.def()
    }
}

impl Related<super::semester_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SemesterResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_semester(self) -> crate::models::curriculum::entities::Semester {
        use crate::models::curriculum::entities::Semester;
        use chrono::{DateTime, Utc};

        Semester {
            id: self.id,
            program_code: self.program_code,
            cohort_id: self.cohort_id,
            name: self.name,
            sort_order: self.sort_order,
            ects_target: self.ects_target,
            is_locked: self.is_locked,
            locked_at: self
                .locked_at
                .map(|ts| DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()),
            locked_by: self.locked_by,
        }
    }
}
