use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 评分方案
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkingScheme {
    Rubric,   // 量规评分
    Flexible, // 自由评分
}

impl MarkingScheme {
    pub const RUBRIC: &'static str = "rubric";
    pub const FLEXIBLE: &'static str = "flexible";
}

impl<'de> Deserialize<'de> for MarkingScheme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<MarkingScheme>().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for MarkingScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkingScheme::Rubric => write!(f, "{}", MarkingScheme::RUBRIC),
            MarkingScheme::Flexible => write!(f, "{}", MarkingScheme::FLEXIBLE),
        }
    }
}

impl std::str::FromStr for MarkingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            MarkingScheme::RUBRIC => Ok(MarkingScheme::Rubric),
            MarkingScheme::FLEXIBLE => Ok(MarkingScheme::Flexible),
            _ => Err(format!(
                "Invalid marking scheme: '{s}'. Supported: rubric, flexible"
            )),
        }
    }
}

// 作业
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: i64,
    // 作业短标识，全局唯一
    pub short_identifier: String,
    pub description: String,
    // 默认截止时间
    pub due_date: DateTime<Utc>,
    // 是否启用分班截止时间
    pub section_due_dates_enabled: bool,
    pub marking_scheme: MarkingScheme,
    pub group_min: i32,
    pub group_max: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    /// 是否为小组作业
    pub fn is_group_assignment(&self) -> bool {
        self.group_max > 1
    }
}

// 班级分组（教学班）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    pub id: i64,
    pub name: String,
}

// 分班截止时间覆盖
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionDueDate {
    pub id: i64,
    pub assignment_id: i64,
    pub section_id: i64,
    pub due_date: Option<DateTime<Utc>>,
}
