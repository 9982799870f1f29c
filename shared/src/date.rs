//! 时间类型模块
//!
//! 提供预订相关的三种时间类型：
//! - `BookingDate`: 日历日期，传输格式 `YYYY-MM-DD`
//! - `ClockTime`: 一天中的时刻，传输格式 `HH:MM:SS`，加法按 24 小时回绕
//! - `DurationMins`: 以分钟计的时长，界面上按 30 分钟步进

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

// =========================================================
// DurationMins - 分钟时长
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMins(u32);

impl DurationMins {
    /// 界面步进
    pub const STEP: u32 = 30;
    /// 默认时长（按一小时的价格卡计算）
    pub const DEFAULT: DurationMins = DurationMins(60);

    #[inline]
    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    #[inline]
    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// 增加一个步进，没有上限
    pub fn increment(self) -> Self {
        Self(self.0.saturating_add(Self::STEP))
    }

    /// 减少一个步进，最少保留一个步进
    pub fn decrement(self) -> Self {
        Self(self.0.saturating_sub(Self::STEP).max(Self::STEP))
    }
}

impl Default for DurationMins {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for DurationMins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.0)
    }
}

// =========================================================
// ClockTime - 时刻
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// 解析 `HH:MM` 或 `HH:MM:SS`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .ok()
            .map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// 界面显示用的 `HH:MM`
    pub fn hhmm(&self) -> String {
        self.0.format("%H:%M").to_string()
    }
}

impl Add<DurationMins> for ClockTime {
    type Output = Self;

    /// 越过午夜时回绕，丢弃整天部分
    fn add(self, rhs: DurationMins) -> Self::Output {
        let delta = chrono::Duration::minutes(i64::from(rhs.as_minutes()));
        Self(self.0.overflowing_add_signed(delta).0)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

impl FromStr for ClockTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid time: {s}"))
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =========================================================
// BookingDate - 日历日期
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingDate(NaiveDate);

impl BookingDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// 解析 `<input type="date">` 的值 (`YYYY-MM-DD`)
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(Self)
    }

    /// 列表中展示的短格式
    pub fn display(&self) -> String {
        self.0.format("%d %b %Y").to_string()
    }
}

impl fmt::Display for BookingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

// =========================================================
// 服务端时间戳解析
// =========================================================

/// 从服务端的 `createdAt` 字符串中取出月份下标 (0..12)
///
/// 兼容 RFC 3339、无时区的 ISO 8601 以及纯日期三种写法。
pub fn month_index(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    let month = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.month())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.month()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.month()))
        .ok()?;
    Some(month as usize - 1)
}

/// 把 `createdAt` 显示为日期，无法解析时原样返回日期部分
pub fn display_created_at(raw: &str) -> String {
    let date_part = raw.split('T').next().unwrap_or(raw);
    BookingDate::parse(date_part)
        .map(|d| d.display())
        .unwrap_or_else(|| date_part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> ClockTime {
        ClockTime::parse(s).unwrap()
    }

    #[test]
    fn test_end_time_within_day() {
        assert_eq!(t("10:00") + DurationMins::from_minutes(90), t("11:30"));
    }

    #[test]
    fn test_end_time_wraps_past_midnight() {
        let end = t("23:45") + DurationMins::from_minutes(30);
        assert_eq!(end, t("00:15"));
        assert_eq!(end.to_string(), "00:15:00");
    }

    #[test]
    fn test_end_time_for_all_half_hour_steps() {
        let start = t("07:10");
        for steps in 1..=96u32 {
            let d = DurationMins::from_minutes(steps * 30);
            let end = start + d;
            let expected = (7 * 60 + 10 + steps * 30) % (24 * 60);
            assert_eq!(end.hour() * 60 + end.minute(), expected);
        }
    }

    #[test]
    fn test_clock_time_wire_format() {
        let json = serde_json::to_string(&t("09:05")).unwrap();
        assert_eq!(json, "\"09:05:00\"");
        let back: ClockTime = serde_json::from_str("\"18:30:00\"").unwrap();
        assert_eq!(back.hhmm(), "18:30");
        assert!(serde_json::from_str::<ClockTime>("\"25:00\"").is_err());
    }

    #[test]
    fn test_booking_date_wire_format() {
        let date = BookingDate::parse("2025-08-14").unwrap();
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2025-08-14\"");
        assert!(BookingDate::parse("").is_none());
        assert!(BookingDate::parse("14/08/2025").is_none());
    }

    #[test]
    fn test_duration_step_floor() {
        let d = DurationMins::from_minutes(30);
        assert_eq!(d.decrement(), DurationMins::from_minutes(30));
        assert_eq!(d.increment().increment(), DurationMins::from_minutes(90));
        assert_eq!(DurationMins::default().as_minutes(), 60);
    }

    #[test]
    fn test_month_index_formats() {
        assert_eq!(month_index("2025-03-02T10:00:00Z"), Some(2));
        assert_eq!(month_index("2025-12-31T23:59:59.123"), Some(11));
        assert_eq!(month_index("2025-01-15"), Some(0));
        assert_eq!(month_index("yesterday"), None);
    }
}
