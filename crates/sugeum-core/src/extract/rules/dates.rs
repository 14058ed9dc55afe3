//! Korean date expression resolution.

use chrono::{Datelike, Duration, NaiveDate};
use regex::Captures;

use super::patterns::{
    DATE_KOREAN_FULL, DATE_KOREAN_MD, DATE_NUMERIC_MD, DATE_YMD, DAYS_BEFORE, DAYS_LATER,
    ISO_DATE_EXACT,
};

/// Output format for resolved dates.
pub const ISO_FORMAT: &str = "%Y-%m-%d";

/// Relative day words and their offsets from the reference date.
const RELATIVE_DAYS: &[(&str, i64)] = &[
    ("오늘", 0),
    ("today", 0),
    ("내일", 1),
    ("tomorrow", 1),
    ("모레", 2),
    ("day after tomorrow", 2),
    ("글피", 3),
    ("어제", -1),
    ("yesterday", -1),
];

/// Weekday names, Monday first.
const WEEKDAYS: &[(&str, i64)] = &[
    ("월요일", 0),
    ("화요일", 1),
    ("수요일", 2),
    ("목요일", 3),
    ("금요일", 4),
    ("토요일", 5),
    ("일요일", 6),
];

const NEXT_WEEK: &[&str] = &["다음주", "다음 주"];
const THIS_WEEK: &[&str] = &["이번주", "이번 주"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchMode {
    /// The whole expression is a date expression.
    Exact,
    /// The date expression is somewhere inside a longer note.
    Search,
}

/// Resolves Korean relative and absolute date expressions against a reference date.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    today: NaiveDate,
}

impl DateResolver {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Reference date used for relative expressions.
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Resolve a date expression to `YYYY-MM-DD`, or `""` when nothing matches.
    ///
    /// Valid ISO dates are returned unchanged. A string shaped like an ISO
    /// date that is not a calendar date (`2025-02-30`) is unresolvable and
    /// gives `""`, so the result is always empty or a real date.
    pub fn resolve(&self, expression: &str) -> String {
        let expression = expression.trim();
        if expression.is_empty() {
            return String::new();
        }

        if ISO_DATE_EXACT.is_match(expression)
            && NaiveDate::parse_from_str(expression, ISO_FORMAT).is_ok()
        {
            return expression.to_string();
        }

        self.resolve_date(expression, MatchMode::Exact)
            .map(format_iso)
            .unwrap_or_default()
    }

    /// Find and resolve the first date expression inside free text.
    pub fn scan(&self, text: &str) -> String {
        self.resolve_date(text, MatchMode::Search)
            .map(format_iso)
            .unwrap_or_default()
    }

    fn resolve_date(&self, text: &str, mode: MatchMode) -> Option<NaiveDate> {
        match mode {
            MatchMode::Exact => self
                .relative_day(text, mode)
                .or_else(|| self.week_relative(text)),
            MatchMode::Search => self
                .week_relative(text)
                .or_else(|| self.relative_day(text, mode)),
        }
        .or_else(|| self.day_offset(text))
        .or_else(|| self.absolute(text))
    }

    fn relative_day(&self, text: &str, mode: MatchMode) -> Option<NaiveDate> {
        RELATIVE_DAYS
            .iter()
            .find(|(word, _)| match mode {
                MatchMode::Exact => text.eq_ignore_ascii_case(word),
                MatchMode::Search => text.contains(word),
            })
            .map(|(_, offset)| self.today + Duration::days(*offset))
    }

    fn week_relative(&self, text: &str) -> Option<NaiveDate> {
        let current = i64::from(self.today.weekday().num_days_from_monday());
        let weekday = find_weekday(text);

        if NEXT_WEEK.iter().any(|w| text.contains(w)) {
            // Sunday gives +1, the same as 7 - 6
            let next_monday = self.today + Duration::days(7 - current);
            return Some(next_monday + Duration::days(weekday.unwrap_or(0)));
        }

        // "이번주 X요일" and a bare "X요일" both mean the next X, never today.
        let target = weekday?;
        let mut days_ahead = target - current;
        if days_ahead <= 0 {
            days_ahead += 7;
        }
        Some(self.today + Duration::days(days_ahead))
    }

    fn day_offset(&self, text: &str) -> Option<NaiveDate> {
        if let Some(caps) = DAYS_LATER.captures(text) {
            let days: i64 = caps[1].parse().ok()?;
            return self.today.checked_add_signed(Duration::try_days(days)?);
        }
        if let Some(caps) = DAYS_BEFORE.captures(text) {
            let days: i64 = caps[1].parse().ok()?;
            return self.today.checked_sub_signed(Duration::try_days(days)?);
        }
        None
    }

    fn absolute(&self, text: &str) -> Option<NaiveDate> {
        // Full dates first so a year is never read as a month/day pair.
        DATE_KOREAN_FULL
            .captures_iter(text)
            .find_map(|caps| ymd_from(&caps))
            .or_else(|| DATE_YMD.captures_iter(text).find_map(|caps| ymd_from(&caps)))
            .or_else(|| {
                DATE_KOREAN_MD
                    .captures_iter(text)
                    .find_map(|caps| self.month_day_from(&caps))
            })
            .or_else(|| {
                DATE_NUMERIC_MD
                    .captures_iter(text)
                    .find_map(|caps| self.month_day_from(&caps))
            })
    }

    /// Month/day without a year: this year, or next year if already past.
    fn month_day_from(&self, caps: &Captures<'_>) -> Option<NaiveDate> {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = self.today.year();

        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        if date < self.today {
            NaiveDate::from_ymd_opt(year + 1, month, day)
        } else {
            Some(date)
        }
    }
}

/// Resolve a date expression against `today`; `""` when unresolvable.
pub fn resolve_korean_date(expression: &str, today: NaiveDate) -> String {
    DateResolver::new(today).resolve(expression)
}

/// Whether `value` is a valid `YYYY-MM-DD` date.
pub fn is_iso_date(value: &str) -> bool {
    ISO_DATE_EXACT.is_match(value) && NaiveDate::parse_from_str(value, ISO_FORMAT).is_ok()
}

fn find_weekday(text: &str) -> Option<i64> {
    WEEKDAYS
        .iter()
        .find(|(name, _)| text.contains(name))
        .map(|(_, offset)| *offset)
}

fn ymd_from(caps: &Captures<'_>) -> Option<NaiveDate> {
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// 2025-01-20 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    }

    fn resolve(expression: &str) -> String {
        DateResolver::new(monday()).resolve(expression)
    }

    #[test]
    fn test_iso_is_identity() {
        assert_eq!(resolve("2025-02-15"), "2025-02-15");
        assert_eq!(resolve("1999-12-31"), "1999-12-31");
        assert_eq!(resolve(" 2030-07-04 "), "2030-07-04");
    }

    #[test]
    fn test_relative_words() {
        assert_eq!(resolve("오늘"), "2025-01-20");
        assert_eq!(resolve("내일"), "2025-01-21");
        assert_eq!(resolve("모레"), "2025-01-22");
        assert_eq!(resolve("글피"), "2025-01-23");
        assert_eq!(resolve("어제"), "2025-01-19");
        assert_eq!(resolve("Tomorrow"), "2025-01-21");
    }

    #[test]
    fn test_next_week() {
        assert_eq!(resolve("다음주 수요일"), "2025-01-29");
        assert_eq!(resolve("다음 주 금요일"), "2025-01-31");
        assert_eq!(resolve("다음주"), "2025-01-27");

        let sunday = NaiveDate::from_ymd_opt(2025, 1, 26).unwrap();
        assert_eq!(DateResolver::new(sunday).resolve("다음주"), "2025-01-27");
        assert_eq!(DateResolver::new(sunday).resolve("다음주 일요일"), "2025-02-02");
    }

    #[test]
    fn test_next_week_wednesday_is_nine_days_after_monday() {
        let today = monday();
        let expected = format_iso(today + Duration::days(9));
        assert_eq!(resolve("다음주 수요일"), expected);
    }

    #[test]
    fn test_this_week_rolls_forward() {
        assert_eq!(resolve("이번주 금요일"), "2025-01-24");
        assert_eq!(resolve("이번 주 월요일"), "2025-01-27");

        let thursday = NaiveDate::from_ymd_opt(2025, 1, 23).unwrap();
        assert_eq!(DateResolver::new(thursday).resolve("이번주 화요일"), "2025-01-28");
    }

    #[test]
    fn test_bare_weekday_is_strictly_future() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        for day in 0..21 {
            let today = start + Duration::days(day);
            let resolver = DateResolver::new(today);
            for (name, _) in WEEKDAYS {
                let resolved = resolver.resolve(name);
                let date = NaiveDate::parse_from_str(&resolved, ISO_FORMAT).unwrap();
                assert!(date > today, "{name} from {today} gave {date}");
                assert!(date <= today + Duration::days(7), "{name} from {today} gave {date}");
            }
        }
    }

    #[test]
    fn test_day_offsets() {
        assert_eq!(resolve("10일 후"), "2025-01-30");
        assert_eq!(resolve("3일 뒤"), "2025-01-23");
        assert_eq!(resolve("5일 전"), "2025-01-15");
    }

    #[test]
    fn test_out_of_range_offsets_yield_empty() {
        assert_eq!(resolve("999999999999999일 후"), "");
        assert_eq!(resolve("999999999999999일 전"), "");
        assert_eq!(resolve("99999999일 뒤"), "");
        assert_eq!(resolve("99999999999999999999999일 후"), "");

        let resolver = DateResolver::new(monday());
        assert_eq!(resolver.scan("북구청 잔금 500만원 999999999999999일 뒤"), "");
        assert_eq!(resolver.scan("잔금 999999999999999일 전 약속"), "");
    }

    #[test]
    fn test_absolute_dates() {
        assert_eq!(resolve("2025년 2월 15일"), "2025-02-15");
        assert_eq!(resolve("2026년 1월 3일"), "2026-01-03");
        assert_eq!(resolve("2025/2/3"), "2025-02-03");
        assert_eq!(resolve("2025-3-7"), "2025-03-07");
        assert_eq!(resolve("3월 10일"), "2025-03-10");
        assert_eq!(resolve("3/15"), "2025-03-15");
        assert_eq!(resolve("01-23"), "2025-01-23");
    }

    #[test]
    fn test_month_day_rolls_to_next_year() {
        assert_eq!(resolve("1월 10일"), "2026-01-10");
        assert_eq!(resolve("1/5"), "2026-01-05");
        assert_eq!(resolve("1월 20일"), "2025-01-20");
    }

    #[test]
    fn test_malformed_dates_yield_empty() {
        assert_eq!(resolve("13/45"), "");
        assert_eq!(resolve("2월 30일"), "");
        assert_eq!(resolve("2025-13-01"), "");
        assert_eq!(resolve("2025-02-30"), "");
        assert_eq!(resolve("월말"), "");
        assert_eq!(resolve("작업 완료 후"), "");
        assert_eq!(resolve(""), "");
    }

    #[test]
    fn test_invalid_month_falls_through_to_later_pattern() {
        // The Korean month/day form is invalid, the numeric one is not.
        assert_eq!(resolve("13월 1일 또는 3/4"), "2025-03-04");
    }

    #[test]
    fn test_scan_inside_notes() {
        let resolver = DateResolver::new(monday());

        assert_eq!(
            resolver.scan("강남 아파트 타일공사 중도금 500만원 다음주 수요일"),
            "2025-01-29"
        );
        assert_eq!(resolver.scan("김사장 인테리어 계약금 300만원 내일 현금"), "2025-01-21");
        assert_eq!(resolver.scan("잔금은 3월 5일에 받기로"), "2025-03-05");
        assert_eq!(resolver.scan("서초 빌라 미장 200만원 15일 계좌이체"), "");
        assert_eq!(resolver.scan("오늘 말고 금요일"), "2025-01-24");
    }

    #[test]
    fn test_relative_words_need_exact_match_in_resolve() {
        assert_eq!(resolve("내일쯤"), "");
        assert_eq!(DateResolver::new(monday()).scan("내일쯤"), "2025-01-21");
    }

    #[test]
    fn test_is_iso_date() {
        assert!(is_iso_date("2025-01-20"));
        assert!(!is_iso_date("2025-1-20"));
        assert!(!is_iso_date("2025-02-30"));
    }
}
