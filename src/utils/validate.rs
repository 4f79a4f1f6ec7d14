use once_cell::sync::Lazy;
use regex::Regex;

static SHORT_IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("Invalid short identifier regex")
});

pub fn validate_short_identifier(short_identifier: &str) -> Result<(), &'static str> {
    // 长度校验：1 <= x <= 30
    if short_identifier.is_empty() || short_identifier.len() > 30 {
        return Err("Short identifier length must be between 1 and 30 characters");
    }
    // 格式校验：字母或数字开头，只能包含字母、数字、下划线或连字符
    if !SHORT_IDENTIFIER_RE.is_match(short_identifier) {
        return Err(
            "Short identifier must start with a letter or digit and contain only letters, numbers, underscores or hyphens",
        );
    }
    Ok(())
}

/// 小组人数上下限校验
pub fn validate_group_bounds(group_min: i32, group_max: i32) -> Result<(), &'static str> {
    if group_min <= 0 {
        return Err("group_min must be greater than 0");
    }
    if group_max <= 0 {
        return Err("group_max must be greater than 0");
    }
    if group_max < group_min {
        return Err("group_max must be greater than the minimum number of groups");
    }
    Ok(())
}

/// 罚分阶段校验：小时数为正，扣分非负
pub fn validate_period(hours: i32, deduction: i32) -> Result<(), &'static str> {
    if hours <= 0 {
        return Err("Period hours must be greater than 0");
    }
    if deduction < 0 {
        return Err("Period deduction must not be negative");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_short_identifier() {
        assert!(validate_short_identifier("A1").is_ok());
        assert!(validate_short_identifier("lab_03-final").is_ok());
    }

    #[test]
    fn test_invalid_short_identifier() {
        assert!(validate_short_identifier("").is_err());
        assert!(validate_short_identifier("-A1").is_err());
        assert!(validate_short_identifier("A 1").is_err());
        assert!(validate_short_identifier(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_group_max_below_min_rejected() {
        assert_eq!(
            validate_group_bounds(3, 2),
            Err("group_max must be greater than the minimum number of groups")
        );
    }

    #[test]
    fn test_non_positive_group_bounds_rejected() {
        assert!(validate_group_bounds(0, 2).is_err());
        assert!(validate_group_bounds(1, 0).is_err());
        assert!(validate_group_bounds(1, 1).is_ok());
    }

    #[test]
    fn test_period_validation() {
        assert!(validate_period(24, 5).is_ok());
        assert!(validate_period(24, 0).is_ok());
        assert!(validate_period(0, 5).is_err());
        assert!(validate_period(24, -1).is_err());
    }
}
