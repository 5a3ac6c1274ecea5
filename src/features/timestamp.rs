//! 投稿日時文字列の解析
//!
//! 解析に失敗してもエラーにはせず `None` を返します。オフセット付きの値は
//! その壁時計時刻とオフセットをそのまま保持し、UTCへの変換は行いません。

use crate::models::PostTimestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// オフセット付きの形式（上から順に試行）
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    // Twitter APIの created_at 形式
    "%a %b %d %H:%M:%S %z %Y",
];

/// オフセットなしの形式
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// 日付のみの形式（0時として扱う）
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// 投稿日時文字列を解析
pub fn parse_timestamp(input: &str) -> Option<PostTimestamp> {
    let value = input.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(PostTimestamp::with_offset(dt.naive_local(), *dt.offset()));
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(PostTimestamp::with_offset(dt.naive_local(), *dt.offset()));
        }
    }

    // "2016-01-01 10:00:00 UTC" のような末尾のUTC表記
    if let Some(stripped) = value.strip_suffix(" UTC") {
        if let Some(parsed) = parse_naive(stripped.trim_end()) {
            return Some(PostTimestamp::with_offset(parsed, chrono::FixedOffset::east_opt(0)?));
        }
    }

    parse_naive(value).map(PostTimestamp::naive)
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_naive_datetime() {
        let ts = parse_timestamp("2016-01-15 09:42:10").unwrap();
        assert_eq!(ts.local.year(), 2016);
        assert_eq!(ts.local.month(), 1);
        assert_eq!(ts.local.hour(), 9);
        assert!(ts.offset.is_none());
    }

    #[test]
    fn test_parse_keeps_local_hour_with_offset() {
        // UTCへ変換すると4時になるが、元の壁時計時刻を維持する
        let ts = parse_timestamp("2017-06-01T09:30:00+05:30").unwrap();
        assert_eq!(ts.local.hour(), 9);
        assert_eq!(ts.offset.map(|o| o.local_minus_utc()), Some(19800));

        let ts = parse_timestamp("2017-06-01 23:05:00-0700").unwrap();
        assert_eq!(ts.local.hour(), 23);
    }

    #[test]
    fn test_parse_twitter_api_format() {
        let ts = parse_timestamp("Wed Oct 10 20:19:24 +0000 2018").unwrap();
        assert_eq!(ts.local.year(), 2018);
        assert_eq!(ts.local.hour(), 20);
    }

    #[test]
    fn test_parse_fractional_and_date_only() {
        let ts = parse_timestamp("2015-12-31 23:59:59.123").unwrap();
        assert_eq!(ts.local.hour(), 23);

        let ts = parse_timestamp("2015-12-31").unwrap();
        assert_eq!(ts.local.hour(), 0);
        assert_eq!(ts.local.day(), 31);
    }

    #[test]
    fn test_parse_utc_suffix() {
        let ts = parse_timestamp("2016-03-01 08:00:00 UTC").unwrap();
        assert_eq!(ts.local.hour(), 8);
        assert_eq!(ts.offset.map(|o| o.local_minus_utc()), Some(0));
    }

    #[test]
    fn test_parse_malformed_returns_none() {
        for input in [
            "",
            "   ",
            "not a date",
            "2016-13-01 10:00:00",
            "2016-02-30 10:00:00",
            "2016-01-01 25:00:00",
            "yesterday at noon",
            "1451606400",
        ] {
            assert!(parse_timestamp(input).is_none(), "expected None for {:?}", input);
        }
    }
}
