pub mod clock;
pub mod validate;

pub use clock::{Clock, FixedClock, SystemClock};

/// 四舍五入保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 时间戳（秒）转换为 UTC 时间
pub fn from_timestamp(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(24.0), 24.0);
        assert_eq!(round2(66.666_666), 66.67);
        assert_eq!(round2(0.004), 0.0);
    }

    #[test]
    fn test_from_timestamp_roundtrip() {
        let ts = 1_700_000_000;
        assert_eq!(from_timestamp(ts).timestamp(), ts);
    }
}
