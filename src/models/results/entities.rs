use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 批改状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarkingState {
    Unmarked,
    Partial,
    Complete,
}

impl std::fmt::Display for MarkingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkingState::Unmarked => write!(f, "unmarked"),
            MarkingState::Partial => write!(f, "partial"),
            MarkingState::Complete => write!(f, "complete"),
        }
    }
}

impl std::str::FromStr for MarkingState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unmarked" => Ok(MarkingState::Unmarked),
            "partial" => Ok(MarkingState::Partial),
            "complete" => Ok(MarkingState::Complete),
            _ => Err(format!("Invalid marking state: {s}")),
        }
    }
}

// 附加分单位
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtraMarkUnit {
    Points,
    Percentage,
}

impl std::fmt::Display for ExtraMarkUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtraMarkUnit::Points => write!(f, "points"),
            ExtraMarkUnit::Percentage => write!(f, "percentage"),
        }
    }
}

impl std::str::FromStr for ExtraMarkUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "points" => Ok(ExtraMarkUnit::Points),
            "percentage" => Ok(ExtraMarkUnit::Percentage),
            _ => Err(format!("Invalid extra mark unit: {s}")),
        }
    }
}

// 某次提交的批改结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionResult {
    pub id: i64,
    pub submission_id: i64,
    pub marking_state: MarkingState,
    pub released_to_students: bool,
    pub created_at: DateTime<Utc>,
}

// 单个评分项的分数，未评为 None
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mark {
    pub id: i64,
    pub result_id: i64,
    pub criterion_id: i64,
    pub mark: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtraMark {
    pub id: i64,
    pub result_id: i64,
    pub extra_mark: f64,
    pub unit: ExtraMarkUnit,
}

// 批改结果及其全部分数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultDetail {
    pub result: SubmissionResult,
    pub marks: Vec<Mark>,
    pub extra_marks: Vec<ExtraMark>,
}

impl ResultDetail {
    pub fn mark_for(&self, criterion_id: i64) -> Option<&Mark> {
        self.marks.iter().find(|m| m.criterion_id == criterion_id)
    }

    /// 附加分之和，没有附加分时为 0（不会得到 -0）
    pub fn total_extra_points(&self) -> f64 {
        self.extra_marks
            .iter()
            .filter(|e| e.unit == ExtraMarkUnit::Points)
            .fold(0.0, |acc, e| acc + e.extra_mark)
    }

    pub fn total_extra_percentage(&self) -> f64 {
        self.extra_marks
            .iter()
            .filter(|e| e.unit == ExtraMarkUnit::Percentage)
            .fold(0.0, |acc, e| acc + e.extra_mark)
    }
}
