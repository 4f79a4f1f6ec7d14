use serde::{Deserialize, Serialize};

// 提交规则类型
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionRuleType {
    NoLate,      // 不接受迟交
    GracePeriod, // 宽限期扣分
}

impl SubmissionRuleType {
    pub const NO_LATE: &'static str = "no_late";
    pub const GRACE_PERIOD: &'static str = "grace_period";
}

impl<'de> Deserialize<'de> for SubmissionRuleType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SubmissionRuleType>()
            .map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SubmissionRuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionRuleType::NoLate => write!(f, "{}", SubmissionRuleType::NO_LATE),
            SubmissionRuleType::GracePeriod => write!(f, "{}", SubmissionRuleType::GRACE_PERIOD),
        }
    }
}

impl std::str::FromStr for SubmissionRuleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SubmissionRuleType::NO_LATE => Ok(SubmissionRuleType::NoLate),
            SubmissionRuleType::GRACE_PERIOD => Ok(SubmissionRuleType::GracePeriod),
            _ => Err(format!(
                "Invalid submission rule type: '{s}'. Supported: no_late, grace_period"
            )),
        }
    }
}

// 罚分阶段
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Period {
    pub id: i64,
    pub submission_rule_id: i64,
    // 本阶段覆盖的小时数
    pub hours: i32,
    // 本阶段扣除的宽限额度
    pub deduction: i32,
    // 从 1 开始的阶段顺序
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoLateSubmissionRule {
    pub id: i64,
    pub assignment_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GracePeriodSubmissionRule {
    pub id: i64,
    pub assignment_id: i64,
    // 按 position 升序
    pub periods: Vec<Period>,
}

impl GracePeriodSubmissionRule {
    /// 所有阶段的总小时数
    pub fn hours_sum(&self) -> i64 {
        self.periods.iter().map(|p| i64::from(p.hours)).sum()
    }
}

// 提交规则，每个作业恰好一条
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum SubmissionRule {
    NoLate(NoLateSubmissionRule),
    GracePeriod(GracePeriodSubmissionRule),
}

impl SubmissionRule {
    pub fn id(&self) -> i64 {
        match self {
            SubmissionRule::NoLate(rule) => rule.id,
            SubmissionRule::GracePeriod(rule) => rule.id,
        }
    }

    pub fn assignment_id(&self) -> i64 {
        match self {
            SubmissionRule::NoLate(rule) => rule.assignment_id,
            SubmissionRule::GracePeriod(rule) => rule.assignment_id,
        }
    }

    pub fn rule_type(&self) -> SubmissionRuleType {
        match self {
            SubmissionRule::NoLate(_) => SubmissionRuleType::NoLate,
            SubmissionRule::GracePeriod(_) => SubmissionRuleType::GracePeriod,
        }
    }

    pub fn periods(&self) -> &[Period] {
        match self {
            SubmissionRule::NoLate(_) => &[],
            SubmissionRule::GracePeriod(rule) => &rule.periods,
        }
    }
}
