//! 评分项实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "criteria")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub position: i32,
    pub criterion_type: String,
    // 量规评分使用 weight，自由评分使用 max_mark
    pub weight: f64,
    pub max_mark: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(has_many = "super::marks::Entity")]
    Marks,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::marks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_criterion(self) -> crate::models::criteria::entities::Criterion {
        use crate::models::assignments::entities::MarkingScheme;
        use crate::models::criteria::entities::{Criterion, CriterionKind};

        let kind = match self.criterion_type.parse::<MarkingScheme>() {
            Ok(MarkingScheme::Flexible) => CriterionKind::Flexible { max: self.max_mark },
            _ => CriterionKind::Rubric {
                weight: self.weight,
            },
        };

        Criterion {
            id: self.id,
            assignment_id: self.assignment_id,
            name: self.name,
            position: self.position,
            kind,
        }
    }
}
