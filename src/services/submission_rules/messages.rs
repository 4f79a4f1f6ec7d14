use tracing::debug;

use super::SubmissionRuleService;
use super::engine::{OvertimeMessage, SubmissionRuleBehavior};
use crate::errors::Result;
use crate::services::due_dates::{GroupingDueDate, load_grouping};
use crate::services::grace_credits::grouping_remaining_credits;

pub async fn overtime_message(
    service: &SubmissionRuleService,
    grouping_id: i64,
) -> Result<Option<OvertimeMessage>> {
    let storage = service.get_storage();
    let grouping = load_grouping(storage.as_ref(), grouping_id).await?;
    let context = GroupingDueDate::load(storage.as_ref(), &grouping).await?;
    let rule = service.load_rule(grouping.assignment_id).await?;
    let now = service.now();

    // 窗口之外不需要查询额度
    if now <= context.due_date || now > rule.calculate_collection_time(context.due_date) {
        return Ok(None);
    }

    let remaining = grouping_remaining_credits(storage.as_ref(), grouping_id).await?;
    let message = rule.overtime_message(context.due_date, now, remaining);
    debug!("小组 {} 超时提示: {:?}", grouping_id, message);
    Ok(message)
}

/// 已过收取时间时返回警告，否则为 None
pub async fn commit_after_collection_message(
    service: &SubmissionRuleService,
    grouping_id: i64,
) -> Result<Option<&'static str>> {
    let storage = service.get_storage();
    let grouping = load_grouping(storage.as_ref(), grouping_id).await?;
    let context = GroupingDueDate::load(storage.as_ref(), &grouping).await?;
    let rule = service.load_rule(grouping.assignment_id).await?;

    if service.now() > rule.calculate_collection_time(context.due_date) {
        Ok(Some(rule.commit_after_collection_message()))
    } else {
        Ok(None)
    }
}
