//! 满分与单次批改结果的总分

use crate::models::assignments::entities::MarkingScheme;
use crate::models::criteria::entities::Criterion;
use crate::models::results::entities::ResultDetail;
use crate::utils::round2;

/// 只保留属于评分方案的评分项
pub fn scheme_criteria(scheme: MarkingScheme, criteria: Vec<Criterion>) -> Vec<Criterion> {
    criteria.into_iter().filter(|c| c.belongs_to(scheme)).collect()
}

/// 量规为 Σ 权重 × 4，自由评分为 Σ 满分，保留两位小数
///
/// 不属于评分方案的评分项不计入。
pub fn total_mark(scheme: MarkingScheme, criteria: &[Criterion]) -> f64 {
    round2(
        criteria
            .iter()
            .filter(|c| c.belongs_to(scheme))
            .fold(0.0, |acc, c| acc + c.out_of()),
    )
}

/// 批改结果的总分：各评分项分值之和，加上附加分与按满分折算的附加百分比，不低于 0
pub fn result_total(detail: &ResultDetail, scheme: MarkingScheme, criteria: &[Criterion]) -> f64 {
    let out_of = total_mark(scheme, criteria);
    let marks = criteria
        .iter()
        .filter(|c| c.belongs_to(scheme))
        .filter_map(|c| {
            detail
                .mark_for(c.id)
                .and_then(|m| m.mark)
                .map(|mark| c.scaled_mark(mark))
        })
        .fold(0.0, |acc, mark| acc + mark);
    let extra = detail.total_extra_points() + detail.total_extra_percentage() * out_of / 100.0;
    round2((marks + extra).max(0.0))
}

/// 总分占满分的百分比，满分为 0 时没有意义
pub fn percentage(total: f64, out_of: f64) -> Option<f64> {
    if out_of == 0.0 {
        None
    } else {
        Some(round2(total / out_of * 100.0))
    }
}
