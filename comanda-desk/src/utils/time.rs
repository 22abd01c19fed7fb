//! 时间工具函数 - 业务时区转换
//!
//! 所有日历分桶 (日、周、月、年、小时) 都按配置的业务时区计算，
//! 不依赖宿主机本地时区。

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

/// 业务时区下的日历日期
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// 日期分桶键 `YYYY-MM-DD` (业务时区)
pub fn date_key(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%Y-%m-%d").to_string()
}

/// 小时分桶键 `HH:00` (业务时区)
pub fn hour_key(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:00").to_string()
}

/// 同一自然月 (业务时区)
pub fn same_month(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    let (a, b) = (a.with_timezone(&tz), b.with_timezone(&tz));
    a.year() == b.year() && a.month() == b.month()
}

/// 同一自然年 (业务时区)
pub fn same_year(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    a.with_timezone(&tz).year() == b.with_timezone(&tz).year()
}

/// 经过的整分钟数 (向下取整，未来时间记 0)
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_minutes().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_keys_use_business_timezone() {
        // 2024-05-18 03:30 UTC 在墨西哥城是 05-17 21:30
        let instant = Utc.with_ymd_and_hms(2024, 5, 18, 3, 30, 0).unwrap();
        let tz = chrono_tz::America::Mexico_City;
        assert_eq!(date_key(instant, tz), "2024-05-17");
        assert_eq!(hour_key(instant, tz), "21:00");
        assert_eq!(date_key(instant, Tz::UTC), "2024-05-18");
    }

    #[test]
    fn test_month_boundary() {
        let tz = chrono_tz::America::Mexico_City;
        let end_of_may_local = Utc.with_ymd_and_hms(2024, 6, 1, 3, 0, 0).unwrap();
        let mid_may = Utc.with_ymd_and_hms(2024, 5, 15, 12, 0, 0).unwrap();
        assert!(same_month(end_of_may_local, mid_may, tz));
        assert!(!same_month(end_of_may_local, mid_may, Tz::UTC));
        assert!(same_year(end_of_may_local, mid_may, Tz::UTC));
    }

    #[test]
    fn test_minutes_between() {
        let a = Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap();
        let b = Utc.with_ymd_and_hms(2024, 5, 17, 12, 10, 59).unwrap();
        assert_eq!(minutes_between(a, b), 10);
        assert_eq!(minutes_between(b, a), 0);
    }
}
