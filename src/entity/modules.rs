//! 教学单元（UE）实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "modules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub semester_id: i64,
    pub code: String,
    pub title: String,
    pub coefficient: f64,
    pub credits: f64,
    pub sort_order: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::semesters::Entity",
        from = "Column::SemesterId",
        to = "super::semesters::Column::Id"
    )]
    Semester,
    #[sea_orm(has_many = "super::chapters::Entity")]
    Chapters,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::module_progress::Entity")]
    ModuleProgress,
}

impl Related<super::semesters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Semester.def()
    }
}

impl Related<super::chapters::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Chapters.def()
    }
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::module_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleProgress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_module_unit(self) -> crate::models::curriculum::entities::ModuleUnit {
        crate::models::curriculum::entities::ModuleUnit {
            id: self.id,
            semester_id: self.semester_id,
            code: self.code,
            title: self.title,
            coefficient: self.coefficient,
            credits: self.credits,
            sort_order: self.sort_order,
            is_active: self.is_active,
        }
    }
}
