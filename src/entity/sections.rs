//! 教学班实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_due_dates::Entity")]
    SectionDueDates,
    #[sea_orm(has_many = "super::students::Entity")]
    Students,
}

impl Related<super::section_due_dates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionDueDates.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Students.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_section(self) -> crate::models::assignments::entities::Section {
        crate::models::assignments::entities::Section {
            id: self.id,
            name: self.name,
        }
    }
}
