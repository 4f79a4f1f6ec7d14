//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub grouping_id: i64,
    pub revision_number: i32,
    pub revision_timestamp: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groupings::Entity",
        from = "Column::GroupingId",
        to = "super::groupings::Column::Id"
    )]
    Grouping,
    #[sea_orm(has_many = "super::results::Entity")]
    Results,
}

impl Related<super::groupings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grouping.def()
    }
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Results.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::utils::from_timestamp;

        crate::models::submissions::entities::Submission {
            id: self.id,
            grouping_id: self.grouping_id,
            revision_number: self.revision_number,
            revision_timestamp: from_timestamp(self.revision_timestamp),
            created_at: from_timestamp(self.created_at),
        }
    }
}
