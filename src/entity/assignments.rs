//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub short_identifier: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub due_date: i64,
    pub section_due_dates_enabled: bool,
    pub marking_scheme: String,
    pub group_min: i32,
    pub group_max: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::section_due_dates::Entity")]
    SectionDueDates,
    #[sea_orm(has_one = "super::submission_rules::Entity")]
    SubmissionRule,
    #[sea_orm(has_many = "super::groupings::Entity")]
    Groupings,
    #[sea_orm(has_many = "super::criteria::Entity")]
    Criteria,
}

impl Related<super::section_due_dates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SectionDueDates.def()
    }
}

impl Related<super::submission_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionRule.def()
    }
}

impl Related<super::groupings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groupings.def()
    }
}

impl Related<super::criteria::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Criteria.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use crate::models::assignments::entities::{Assignment, MarkingScheme};
        use crate::utils::from_timestamp;

        Assignment {
            id: self.id,
            short_identifier: self.short_identifier,
            description: self.description,
            due_date: from_timestamp(self.due_date),
            section_due_dates_enabled: self.section_due_dates_enabled,
            marking_scheme: self
                .marking_scheme
                .parse::<MarkingScheme>()
                .unwrap_or(MarkingScheme::Rubric),
            group_min: self.group_min,
            group_max: self.group_max,
            created_at: from_timestamp(self.created_at),
            updated_at: from_timestamp(self.updated_at),
        }
    }
}
