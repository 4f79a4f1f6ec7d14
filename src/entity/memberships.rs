//! 小组成员实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "memberships")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub grouping_id: i64,
    pub user_id: i64,
    pub status: String,
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
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::UserId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::grace_period_deductions::Entity")]
    Deductions,
}

impl Related<super::groupings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Grouping.def()
    }
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::grace_period_deductions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deductions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_membership(self) -> crate::models::groupings::entities::Membership {
        use crate::models::groupings::entities::{Membership, MembershipStatus};

        Membership {
            id: self.id,
            grouping_id: self.grouping_id,
            user_id: self.user_id,
            status: self
                .status
                .parse::<MembershipStatus>()
                .unwrap_or(MembershipStatus::Pending),
        }
    }
}
