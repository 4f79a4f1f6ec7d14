use serde::Serialize;

// 单个评分项的报表单元：分数（可空）与权重或满分
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CriterionCell {
    pub mark: Option<f64>,
    pub weight_or_max: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GraceCredits {
    pub remaining: i64,
    pub total: i64,
}

/// 详细成绩报表的一行，由外部 CSV 层逐行写出
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentReportRow {
    pub username: String,
    pub percentage: Option<f64>,
    pub criteria: Vec<CriterionCell>,
    pub extra_points: Option<f64>,
    pub extra_percentage: Option<f64>,
    pub grace_credits: GraceCredits,
}

impl StudentReportRow {
    /// 按列展开，空值输出为空串
    pub fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(self.criteria.len() * 2 + 5);
        record.push(self.username.clone());
        record.push(blank_or(self.percentage));
        for cell in &self.criteria {
            record.push(blank_or(cell.mark));
            record.push(cell.weight_or_max.to_string());
        }
        record.push(blank_or(self.extra_points));
        record.push(blank_or(self.extra_percentage));
        record.push(format!(
            "{}/{}",
            self.grace_credits.remaining, self.grace_credits.total
        ));
        record
    }
}

/// 简要成绩报表的一行
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimpleReportRow {
    pub username: String,
    pub percentage: Option<f64>,
}

impl SimpleReportRow {
    pub fn to_record(&self) -> Vec<String> {
        vec![self.username.clone(), blank_or(self.percentage)]
    }
}

fn blank_or(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_submission() {
        let row = StudentReportRow {
            username: "c5bennet".to_string(),
            percentage: None,
            criteria: vec![
                CriterionCell {
                    mark: None,
                    weight_or_max: 2.0,
                },
                CriterionCell {
                    mark: None,
                    weight_or_max: 1.5,
                },
            ],
            extra_points: None,
            extra_percentage: None,
            grace_credits: GraceCredits {
                remaining: 3,
                total: 5,
            },
        };
        assert_eq!(
            row.to_record(),
            vec!["c5bennet", "", "", "2", "", "1.5", "", "", "3/5"]
        );
    }

    #[test]
    fn test_simple_record() {
        let row = SimpleReportRow {
            username: "c5bennet".to_string(),
            percentage: Some(87.5),
        };
        assert_eq!(row.to_record(), vec!["c5bennet", "87.5"]);
    }
}
