//! 罚分阶段实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "periods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_rule_id: i64,
    pub hours: i32,
    pub deduction: i32,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submission_rules::Entity",
        from = "Column::SubmissionRuleId",
        to = "super::submission_rules::Column::Id"
    )]
    SubmissionRule,
}

impl Related<super::submission_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionRule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_period(self) -> crate::models::submission_rules::entities::Period {
        crate::models::submission_rules::entities::Period {
            id: self.id,
            submission_rule_id: self.submission_rule_id,
            hours: self.hours,
            deduction: self.deduction,
            position: self.position,
        }
    }
}
