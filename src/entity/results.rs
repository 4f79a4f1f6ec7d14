//! 批改结果实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub marking_state: String,
    pub released_to_students: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
    #[sea_orm(has_many = "super::marks::Entity")]
    Marks,
    #[sea_orm(has_many = "super::extra_marks::Entity")]
    ExtraMarks,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marks.def()
    }
}

impl Related<super::extra_marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExtraMarks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_result(self) -> crate::models::results::entities::SubmissionResult {
        use crate::models::results::entities::{MarkingState, SubmissionResult};
        use crate::utils::from_timestamp;

        SubmissionResult {
            id: self.id,
            submission_id: self.submission_id,
            marking_state: self
                .marking_state
                .parse::<MarkingState>()
                .unwrap_or(MarkingState::Unmarked),
            released_to_students: self.released_to_students,
            created_at: from_timestamp(self.created_at),
        }
    }
}
