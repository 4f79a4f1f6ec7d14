//! 提交规则引擎
//!
//! 规则以带标签的枚举保存，行为由 [`SubmissionRuleBehavior`] 描述。
//! 所有计算都以调用方给出的截止时间为基准，不访问存储。

use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::models::assignments::entities::Assignment;
use crate::models::submission_rules::entities::{
    GracePeriodSubmissionRule, NoLateSubmissionRule, Period, SubmissionRule,
};
use crate::models::submissions::entities::Submission;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// 迟交一次提交产生的罚分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatePenalty {
    pub overtime_hours: i64,
    // 每个已接受成员各自扣除的宽限额度
    pub deduction: i32,
}

/// 截止时间之后、收取时间之前展示给学生的提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OvertimeMessage {
    WithCreditsLeft {
        credits_needed: i64,
        credits_remaining: i64,
    },
    WithoutCreditsLeft {
        credits_needed: i64,
        credits_remaining: i64,
    },
}

impl fmt::Display for OvertimeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OvertimeMessage::WithCreditsLeft {
                credits_needed,
                credits_remaining,
            } => write!(
                f,
                "The due date has passed. Submitting now will use {credits_needed} of your \
                 {credits_remaining} remaining grace credits."
            ),
            OvertimeMessage::WithoutCreditsLeft {
                credits_needed,
                credits_remaining,
            } => write!(
                f,
                "The due date has passed. Submitting now needs {credits_needed} grace credits \
                 but your group only has {credits_remaining} left."
            ),
        }
    }
}

pub trait SubmissionRuleBehavior {
    /// 截止后仍接受提交的最晚时间
    fn calculate_collection_time(&self, due_date: DateTime<Utc>) -> DateTime<Utc>;

    /// 计算提交的迟交罚分，按时提交返回 None
    fn apply_to_submission(
        &self,
        due_date: DateTime<Utc>,
        submission: &Submission,
    ) -> Option<LatePenalty>;

    fn is_valid_for_assignment(&self, _assignment: &Assignment) -> bool {
        true
    }

    fn describe_rule(&self) -> String;

    /// 收取时间之后提交时的警告
    fn commit_after_collection_message(&self) -> &'static str;

    /// 截止时间与收取时间之间的提示，窗口之外为 None
    fn overtime_message(
        &self,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
        credits_remaining: i64,
    ) -> Option<OvertimeMessage>;
}

/// 超时小时数，不足一小时按一小时计
pub fn overtime_hours(due_date: DateTime<Utc>, timestamp: DateTime<Utc>) -> i64 {
    if timestamp <= due_date {
        return 0;
    }
    let elapsed = (timestamp - due_date).num_milliseconds();
    (elapsed + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR
}

/// 按阶段顺序累计扣除，直到超时小时数被消耗完
pub fn calculate_deduction_amount(periods: &[Period], overtime_hours: i64) -> i32 {
    let mut remaining = overtime_hours;
    let mut total = 0;
    for period in periods {
        total += period.deduction;
        remaining -= i64::from(period.hours);
        if remaining <= 0 {
            break;
        }
    }
    total
}

impl SubmissionRuleBehavior for NoLateSubmissionRule {
    fn calculate_collection_time(&self, due_date: DateTime<Utc>) -> DateTime<Utc> {
        due_date
    }

    fn apply_to_submission(
        &self,
        _due_date: DateTime<Utc>,
        _submission: &Submission,
    ) -> Option<LatePenalty> {
        None
    }

    fn describe_rule(&self) -> String {
        "No late submissions are accepted; work is collected at the due date.".to_string()
    }

    fn commit_after_collection_message(&self) -> &'static str {
        "The due date has passed. Work committed now will not be collected for grading."
    }

    fn overtime_message(
        &self,
        _due_date: DateTime<Utc>,
        _now: DateTime<Utc>,
        _credits_remaining: i64,
    ) -> Option<OvertimeMessage> {
        None
    }
}

impl SubmissionRuleBehavior for GracePeriodSubmissionRule {
    fn calculate_collection_time(&self, due_date: DateTime<Utc>) -> DateTime<Utc> {
        due_date + Duration::hours(self.hours_sum())
    }

    fn apply_to_submission(
        &self,
        due_date: DateTime<Utc>,
        submission: &Submission,
    ) -> Option<LatePenalty> {
        if submission.revision_timestamp <= due_date {
            return None;
        }
        let hours = overtime_hours(due_date, submission.revision_timestamp);
        Some(LatePenalty {
            overtime_hours: hours,
            deduction: calculate_deduction_amount(&self.periods, hours),
        })
    }

    fn describe_rule(&self) -> String {
        if self.periods.is_empty() {
            return "Grace period rule without periods; work is collected at the due date."
                .to_string();
        }
        let tiers: Vec<String> = self
            .periods
            .iter()
            .map(|p| format!("{}h for {} credit(s)", p.hours, p.deduction))
            .collect();
        format!(
            "Late submissions are accepted for {} hours after the due date: {}.",
            self.hours_sum(),
            tiers.join(", ")
        )
    }

    fn commit_after_collection_message(&self) -> &'static str {
        "The grace period has ended. Work committed now will probably not be graded."
    }

    fn overtime_message(
        &self,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
        credits_remaining: i64,
    ) -> Option<OvertimeMessage> {
        if now <= due_date || now > self.calculate_collection_time(due_date) {
            return None;
        }
        let credits_needed = i64::from(calculate_deduction_amount(
            &self.periods,
            overtime_hours(due_date, now),
        ));
        if credits_remaining >= credits_needed {
            Some(OvertimeMessage::WithCreditsLeft {
                credits_needed,
                credits_remaining,
            })
        } else {
            Some(OvertimeMessage::WithoutCreditsLeft {
                credits_needed,
                credits_remaining,
            })
        }
    }
}

impl SubmissionRuleBehavior for SubmissionRule {
    fn calculate_collection_time(&self, due_date: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            SubmissionRule::NoLate(rule) => rule.calculate_collection_time(due_date),
            SubmissionRule::GracePeriod(rule) => rule.calculate_collection_time(due_date),
        }
    }

    fn apply_to_submission(
        &self,
        due_date: DateTime<Utc>,
        submission: &Submission,
    ) -> Option<LatePenalty> {
        match self {
            SubmissionRule::NoLate(rule) => rule.apply_to_submission(due_date, submission),
            SubmissionRule::GracePeriod(rule) => rule.apply_to_submission(due_date, submission),
        }
    }

    fn is_valid_for_assignment(&self, assignment: &Assignment) -> bool {
        match self {
            SubmissionRule::NoLate(rule) => rule.is_valid_for_assignment(assignment),
            SubmissionRule::GracePeriod(rule) => rule.is_valid_for_assignment(assignment),
        }
    }

    fn describe_rule(&self) -> String {
        match self {
            SubmissionRule::NoLate(rule) => rule.describe_rule(),
            SubmissionRule::GracePeriod(rule) => rule.describe_rule(),
        }
    }

    fn commit_after_collection_message(&self) -> &'static str {
        match self {
            SubmissionRule::NoLate(rule) => rule.commit_after_collection_message(),
            SubmissionRule::GracePeriod(rule) => rule.commit_after_collection_message(),
        }
    }

    fn overtime_message(
        &self,
        due_date: DateTime<Utc>,
        now: DateTime<Utc>,
        credits_remaining: i64,
    ) -> Option<OvertimeMessage> {
        match self {
            SubmissionRule::NoLate(rule) => rule.overtime_message(due_date, now, credits_remaining),
            SubmissionRule::GracePeriod(rule) => {
                rule.overtime_message(due_date, now, credits_remaining)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn due() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn two_day_rule() -> GracePeriodSubmissionRule {
        GracePeriodSubmissionRule {
            id: 1,
            assignment_id: 1,
            periods: vec![
                Period {
                    id: 1,
                    submission_rule_id: 1,
                    hours: 24,
                    deduction: 5,
                    position: 1,
                },
                Period {
                    id: 2,
                    submission_rule_id: 1,
                    hours: 24,
                    deduction: 10,
                    position: 2,
                },
            ],
        }
    }

    fn submission_at(ts: DateTime<Utc>) -> Submission {
        Submission {
            id: 1,
            grouping_id: 1,
            revision_number: 1,
            revision_timestamp: ts,
            created_at: ts,
        }
    }

    #[test]
    fn test_collection_time_sums_period_hours() {
        let rule = SubmissionRule::GracePeriod(two_day_rule());
        assert_eq!(
            rule.calculate_collection_time(due()),
            due() + Duration::hours(48)
        );
        // 重复计算结果不变
        assert_eq!(
            rule.calculate_collection_time(due()),
            rule.calculate_collection_time(due())
        );
    }

    #[test]
    fn test_no_late_collects_at_due_date() {
        let rule = SubmissionRule::NoLate(NoLateSubmissionRule {
            id: 1,
            assignment_id: 1,
        });
        assert_eq!(rule.calculate_collection_time(due()), due());
        let late = submission_at(due() + Duration::hours(3));
        assert_eq!(rule.apply_to_submission(due(), &late), None);
    }

    #[test]
    fn test_on_time_submission_has_no_penalty() {
        let rule = two_day_rule();
        assert_eq!(rule.apply_to_submission(due(), &submission_at(due())), None);
    }

    #[test]
    fn test_first_period_deduction() {
        let rule = two_day_rule();
        let penalty = rule
            .apply_to_submission(due(), &submission_at(due() + Duration::hours(10)))
            .unwrap();
        assert_eq!(penalty.overtime_hours, 10);
        assert_eq!(penalty.deduction, 5);
    }

    #[test]
    fn test_deduction_is_cumulative() {
        let rule = two_day_rule();
        let penalty = rule
            .apply_to_submission(due(), &submission_at(due() + Duration::hours(30)))
            .unwrap();
        assert_eq!(penalty.deduction, 15);
    }

    #[test]
    fn test_overtime_hours_rounds_up() {
        assert_eq!(overtime_hours(due(), due() + Duration::seconds(1)), 1);
        assert_eq!(overtime_hours(due(), due() + Duration::hours(24)), 24);
        assert_eq!(overtime_hours(due(), due() + Duration::minutes(24 * 60 + 1)), 25);
        assert_eq!(overtime_hours(due(), due() - Duration::hours(2)), 0);
    }

    #[test]
    fn test_deduction_boundary_between_periods() {
        let rule = two_day_rule();
        assert_eq!(calculate_deduction_amount(&rule.periods, 24), 5);
        assert_eq!(calculate_deduction_amount(&rule.periods, 25), 15);
        // 超出全部阶段时扣除全部额度
        assert_eq!(calculate_deduction_amount(&rule.periods, 100), 15);
        assert_eq!(calculate_deduction_amount(&[], 5), 0);
    }

    #[test]
    fn test_overtime_message_window() {
        let rule = two_day_rule();
        assert_eq!(rule.overtime_message(due(), due(), 10), None);
        assert_eq!(
            rule.overtime_message(due(), due() + Duration::hours(49), 10),
            None
        );

        let message = rule
            .overtime_message(due(), due() + Duration::hours(2), 10)
            .unwrap();
        assert_eq!(
            message,
            OvertimeMessage::WithCreditsLeft {
                credits_needed: 5,
                credits_remaining: 10
            }
        );

        let message = rule
            .overtime_message(due(), due() + Duration::hours(26), 10)
            .unwrap();
        assert_eq!(
            message,
            OvertimeMessage::WithoutCreditsLeft {
                credits_needed: 15,
                credits_remaining: 10
            }
        );
        assert!(message.to_string().contains("only has 10 left"));
    }

    #[test]
    fn test_describe_rule() {
        let description = two_day_rule().describe_rule();
        assert!(description.contains("48 hours"));
        assert!(description.contains("24h for 10 credit(s)"));
    }

    #[test]
    fn test_rule_serializes_with_tag() {
        let rule = SubmissionRule::NoLate(NoLateSubmissionRule {
            id: 3,
            assignment_id: 9,
        });
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["rule_type"], "no_late");
        assert_eq!(json["assignment_id"], 9);
    }
}
