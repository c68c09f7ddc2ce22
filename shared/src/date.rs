//! 租期日期类型
//!
//! - `RentalDate`: 日历日期，传输格式为 `YYYY-MM-DD`
//! - `inclusive_days`: 计算起止日期之间（含首尾）的天数

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::ValidationError;

const WIRE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%d/%m/%Y";

// =========================================================
// RentalDate - 可传输的日历日期
// =========================================================

/// 租期中的一天
///
/// 日期输入框产生 `YYYY-MM-DD`，服务端回传时可能带上完整的
/// RFC 3339 时间戳，这里只保留日期部分。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RentalDate(NaiveDate);

impl RentalDate {
    /// 从年月日创建，非法日期返回 None
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// 解析 `YYYY-MM-DD` 或 RFC 3339 时间戳
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, WIRE_FORMAT) {
            return Some(Self(date));
        }
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self(dt.date_naive()))
    }

    #[inline]
    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }

    /// 越南格式 `dd/mm/yyyy`，用于表格展示
    pub fn display_local(&self) -> String {
        self.0.format(DISPLAY_FORMAT).to_string()
    }
}

/// 起止日期之间（含首尾）的天数
///
/// 结束日期早于开始日期时返回 None。
pub fn inclusive_days(start: RentalDate, end: RentalDate) -> Option<i64> {
    if end < start {
        return None;
    }
    Some((end.0 - start.0).num_days() + 1)
}

impl fmt::Display for RentalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl FromStr for RentalDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::InvalidDate(s.to_string()))
    }
}

impl From<NaiveDate> for RentalDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for RentalDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RentalDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid rental date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> RentalDate {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("2025-01-01", "2025-01-01", 1)]
    #[case("2025-01-01", "2025-01-03", 3)]
    #[case("2024-02-28", "2024-03-01", 3)]
    #[case("2025-12-31", "2026-01-01", 2)]
    fn test_inclusive_days(#[case] start: &str, #[case] end: &str, #[case] expected: i64) {
        assert_eq!(inclusive_days(date(start), date(end)), Some(expected));
    }

    #[test]
    fn test_reversed_range_has_no_days() {
        assert_eq!(inclusive_days(date("2025-01-03"), date("2025-01-01")), None);
    }

    #[test]
    fn test_parse_rfc3339_keeps_calendar_date() {
        assert_eq!(date("2025-01-03T00:00:00.000Z"), date("2025-01-03"));
        assert_eq!(date("2025-01-03T10:30:00+07:00").to_string(), "2025-01-03");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(RentalDate::parse("").is_none());
        assert!(RentalDate::parse("03/01/2025").is_none());
        assert_eq!(
            "tomorrow".parse::<RentalDate>(),
            Err(ValidationError::InvalidDate("tomorrow".to_string()))
        );
    }

    #[test]
    fn test_display_local() {
        assert_eq!(date("2025-01-03").display_local(), "03/01/2025");
    }
}
