//! 测评实体（devoir / examen）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub module_id: i64,
    pub kind: String,
    pub eval_kind: String,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub total_points: f64,
    pub coefficient: f64,
    pub is_published: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::modules::Entity",
        from = "Column::ModuleId",
        to = "super::modules::Column::Id"
    )]
    Module,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_assignment(self) -> crate::models::submissions::entities::Assignment {
        use crate::models::submissions::entities::{Assignment, AssignmentKind, EvalKind};
        use chrono::{DateTime, Utc};

        Assignment {
            id: self.id,
            module_id: self.module_id,
            kind: self
                .kind
                .parse::<AssignmentKind>()
                .unwrap_or(AssignmentKind::Homework),
            eval_kind: self
                .eval_kind
                .parse::<EvalKind>()
                .unwrap_or(EvalKind::Continuous),
            title: self.title,
            description: self.description,
            total_points: self.total_points,
            coefficient: self.coefficient,
            is_published: self.is_published,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
