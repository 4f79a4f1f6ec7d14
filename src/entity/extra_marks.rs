//! 附加分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "extra_marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub result_id: i64,
    pub extra_mark: f64,
    pub unit: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::results::Entity",
        from = "Column::ResultId",
        to = "super::results::Column::Id"
    )]
    SubmissionResult,
}

impl Related<super::results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubmissionResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_extra_mark(self) -> crate::models::results::entities::ExtraMark {
        use crate::models::results::entities::{ExtraMark, ExtraMarkUnit};

        ExtraMark {
            id: self.id,
            result_id: self.result_id,
            extra_mark: self.extra_mark,
            unit: self
                .unit
                .parse::<ExtraMarkUnit>()
                .unwrap_or(ExtraMarkUnit::Points),
        }
    }
}
