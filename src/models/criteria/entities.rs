use serde::{Deserialize, Serialize};

use crate::models::assignments::entities::MarkingScheme;

/// 量规评分中基准等级之上的等级数
pub const RUBRIC_LEVELS: f64 = 4.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "criterion_type", rename_all = "snake_case")]
pub enum CriterionKind {
    Rubric { weight: f64 },
    Flexible { max: f64 },
}

// 评分项
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Criterion {
    pub id: i64,
    pub assignment_id: i64,
    pub name: String,
    pub position: i32,
    #[serde(flatten)]
    pub kind: CriterionKind,
}

impl CriterionKind {
    /// 该类评分项所属的评分方案
    pub fn scheme(&self) -> MarkingScheme {
        match self {
            CriterionKind::Rubric { .. } => MarkingScheme::Rubric,
            CriterionKind::Flexible { .. } => MarkingScheme::Flexible,
        }
    }
}

impl Criterion {
    pub fn belongs_to(&self, scheme: MarkingScheme) -> bool {
        self.kind.scheme() == scheme
    }

    /// 该评分项可得的最高分
    pub fn out_of(&self) -> f64 {
        match self.kind {
            CriterionKind::Rubric { weight } => weight * RUBRIC_LEVELS,
            CriterionKind::Flexible { max } => max,
        }
    }

    /// 报表中与分数成对输出的值：量规为权重，自由评分为满分
    pub fn weight_or_max(&self) -> f64 {
        match self.kind {
            CriterionKind::Rubric { weight } => weight,
            CriterionKind::Flexible { max } => max,
        }
    }

    /// 把录入的分数换算为计入总分的分值
    pub fn scaled_mark(&self, mark: f64) -> f64 {
        match self.kind {
            CriterionKind::Rubric { weight } => mark * weight,
            CriterionKind::Flexible { .. } => mark,
        }
    }
}
