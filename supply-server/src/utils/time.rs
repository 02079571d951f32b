//! 时间工具函数 — 业务时区与期间窗口
//!
//! 所有 "YYYY-MM" 期间键 → 时间窗口的转换统一在 handler / 聚合层完成，
//! store 层只接收具体的 `DateTime<Utc>` 边界。

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析期间键 (YYYY-MM)，返回该月第一天
pub fn parse_period_month(period: &str) -> AppResult<NaiveDate> {
    // 只接受规范形式 "YYYY-MM"
    if period.len() != 7 {
        return Err(AppError::validation(format!(
            "Invalid period key: {} (expected YYYY-MM)",
            period
        )));
    }
    NaiveDate::parse_from_str(&format!("{}-01", period), "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!("Invalid period key: {} (expected YYYY-MM)", period))
    })
}

/// 期间键 → [月初, 次月初) 的 UTC 窗口 (业务时区)
///
/// DST gap fallback: 如果本地时间不存在 (夏令时跳跃)，fallback 到 UTC。
pub fn period_bounds(period: &str, tz: Tz) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start_date = parse_period_month(period)?;
    let end_date = next_month(start_date);
    Ok((day_start_utc(start_date, tz), day_start_utc(end_date, tz)))
}

/// 时间戳所属期间键 (业务时区)
pub fn period_key(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format("%Y-%m").to_string()
}

/// 日期 00:00:00 (业务时区) → UTC 时间戳
fn day_start_utc(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_hms_opt(0, 0, 0).unwrap();
    naive
        .and_local_timezone(tz)
        .latest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// 次月第一天
fn next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// 两个时间戳之间的天数 (可为小数)
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_seconds() as f64 / 86_400.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parse_period_accepts_canonical_key() {
        assert_eq!(
            parse_period_month("2024-03").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn parse_period_rejects_malformed_keys() {
        for bad in ["2024-3", "202403", "2024-13", "garbage", "2024-03-01"] {
            assert!(parse_period_month(bad).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn period_bounds_cover_exactly_one_month() {
        let (start, end) = period_bounds("2024-02", chrono_tz::UTC).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn period_bounds_wrap_year_end() {
        let (start, end) = period_bounds("2024-12", chrono_tz::UTC).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn days_between_is_fractional() {
        let a = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap();
        assert!((days_between(a, b) - 1.5).abs() < 1e-9);
    }
}
