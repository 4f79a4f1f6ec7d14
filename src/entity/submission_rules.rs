//! 提交规则实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submission_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub assignment_id: i64,
    pub rule_type: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(has_many = "super::periods::Entity")]
    Periods,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::periods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Periods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 组装业务规则；未知的规则类型说明数据与代码不一致
    pub fn into_submission_rule(
        self,
        periods: Vec<super::periods::Model>,
    ) -> crate::errors::Result<crate::models::submission_rules::entities::SubmissionRule> {
        use crate::errors::GradingError;
        use crate::models::submission_rules::entities::{
            GracePeriodSubmissionRule, NoLateSubmissionRule, SubmissionRule, SubmissionRuleType,
        };

        let rule_type = self.rule_type.parse::<SubmissionRuleType>().map_err(|e| {
            GradingError::contract_violation(format!(
                "submission rule {} has no registered implementation: {e}",
                self.id
            ))
        })?;

        let rule = match rule_type {
            SubmissionRuleType::NoLate => SubmissionRule::NoLate(NoLateSubmissionRule {
                id: self.id,
                assignment_id: self.assignment_id,
            }),
            SubmissionRuleType::GracePeriod => {
                let mut periods: Vec<_> = periods.into_iter().map(|p| p.into_period()).collect();
                periods.sort_by_key(|p| p.position);
                SubmissionRule::GracePeriod(GracePeriodSubmissionRule {
                    id: self.id,
                    assignment_id: self.assignment_id,
                    periods,
                })
            }
        };

        Ok(rule)
    }
}
