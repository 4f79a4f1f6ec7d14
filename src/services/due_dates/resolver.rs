//! 截止时间解析
//!
//! 纯函数，当前时间由调用方传入。

use chrono::{DateTime, Utc};

use crate::models::assignments::entities::{Assignment, SectionDueDate};

/// 单一截止时间场景下报告使用的名称
pub const SINGLE_DUE_DATE_NAME: &str = "Due Date";

fn section_override(
    assignment: &Assignment,
    section_due_dates: &[SectionDueDate],
    section_id: i64,
) -> Option<DateTime<Utc>> {
    section_due_dates
        .iter()
        .find(|d| d.assignment_id == assignment.id && d.section_id == section_id)
        .and_then(|d| d.due_date)
}

fn configured_dates<'a>(
    assignment: &'a Assignment,
    section_due_dates: &'a [SectionDueDate],
) -> impl Iterator<Item = DateTime<Utc>> + 'a {
    section_due_dates
        .iter()
        .filter(move |d| d.assignment_id == assignment.id)
        .filter_map(|d| d.due_date)
}

/// 某教学班适用的截止时间
///
/// 未启用分班截止时间或未给出教学班时返回作业截止时间；
/// 教学班没有覆盖或覆盖未设置日期时同样回退到作业截止时间。
pub fn effective_due_date(
    assignment: &Assignment,
    section_due_dates: &[SectionDueDate],
    section_id: Option<i64>,
) -> DateTime<Utc> {
    if !assignment.section_due_dates_enabled {
        return assignment.due_date;
    }
    section_id
        .and_then(|id| section_override(assignment, section_due_dates, id))
        .unwrap_or(assignment.due_date)
}

/// 作业截止时间与全部分班截止时间中最晚的一个
pub fn latest_due_date(
    assignment: &Assignment,
    section_due_dates: &[SectionDueDate],
) -> DateTime<Utc> {
    if !assignment.section_due_dates_enabled {
        return assignment.due_date;
    }
    configured_dates(assignment, section_due_dates)
        .fold(assignment.due_date, |latest, d| latest.max(d))
}

/// 是否已过截止时间
///
/// 启用分班截止时间且有教学班的覆盖日期时以覆盖为准，
/// 否则退化为 [`past_all_due_dates`]。
pub fn is_past_due_date(
    assignment: &Assignment,
    section_due_dates: &[SectionDueDate],
    inviter_section_id: Option<i64>,
    now: DateTime<Utc>,
) -> bool {
    if assignment.section_due_dates_enabled {
        if let Some(due) =
            inviter_section_id.and_then(|id| section_override(assignment, section_due_dates, id))
        {
            return now > due;
        }
    }
    past_all_due_dates(assignment, section_due_dates, now)
}

/// 启用分班截止时间时，任一已配置的分班日期已过即为 true；
/// 一个日期都没有配置时按作业截止时间判断
pub fn past_all_due_dates(
    assignment: &Assignment,
    section_due_dates: &[SectionDueDate],
    now: DateTime<Utc>,
) -> bool {
    if !assignment.section_due_dates_enabled {
        return now > assignment.due_date;
    }
    let mut dates = configured_dates(assignment, section_due_dates).peekable();
    if dates.peek().is_none() {
        return now > assignment.due_date;
    }
    dates.any(|d| now > d)
}

/// 已过截止时间的教学班名称，未启用分班截止时间时为 `"Due Date"`
pub fn section_names_past_due_date<F>(
    assignment: &Assignment,
    section_due_dates: &[SectionDueDate],
    now: DateTime<Utc>,
    section_name: F,
) -> Vec<String>
where
    F: Fn(i64) -> Option<String>,
{
    if !assignment.section_due_dates_enabled {
        if now > assignment.due_date {
            return vec![SINGLE_DUE_DATE_NAME.to_string()];
        }
        return Vec::new();
    }

    section_due_dates
        .iter()
        .filter(|d| d.assignment_id == assignment.id)
        .filter(|d| d.due_date.is_some_and(|due| now > due))
        .filter_map(|d| section_name(d.section_id))
        .collect()
}
