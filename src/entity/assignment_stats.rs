//! 作业统计实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub assignment_id: i64,
    pub results_average: f64,
    pub results_median: f64,
    pub results_fails: i64,
    pub results_zeros: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_stats(self) -> crate::models::stats::entities::AssignmentStats {
        crate::models::stats::entities::AssignmentStats {
            assignment_id: self.assignment_id,
            results_average: self.results_average,
            results_median: self.results_median,
            results_fails: self.results_fails,
            results_zeros: self.results_zeros,
            updated_at: crate::utils::from_timestamp(self.updated_at),
        }
    }
}
