//! Korean amount expressions: 억, 천만, 백만, 만, 천.

use regex::{Captures, Regex};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

use super::patterns::{
    AMOUNT_BAEKMAN, AMOUNT_CHEON, AMOUNT_CHEONMAN, AMOUNT_EOK, AMOUNT_MAN, CANONICAL_WON,
    NOTE_AMOUNT_BAEKMAN, NOTE_AMOUNT_CHEONMAN, NOTE_AMOUNT_EOK, NOTE_AMOUNT_GROUPED,
    NOTE_AMOUNT_MAN, NOTE_AMOUNT_PLAIN,
};
use super::{ExtractionMatch, FieldExtractor};

const EOK: u64 = 100_000_000;
const CHEONMAN: u64 = 10_000_000;
const BAEKMAN: u64 = 1_000_000;
const MAN: u64 = 10_000;
const CHEON: u64 = 1_000;

/// Currency suffix.
pub const WON: &str = "원";

/// Magnitude words below 억, largest first. A count defaults to 1 when absent.
fn lower_units() -> [(&'static Regex, u64); 4] {
    [
        (&*AMOUNT_CHEONMAN, CHEONMAN),
        (&*AMOUNT_BAEKMAN, BAEKMAN),
        (&*AMOUNT_MAN, MAN),
        (&*AMOUNT_CHEON, CHEON),
    ]
}

/// Normalize an amount expression to `"1,234,000원"`.
///
/// Returns the input unchanged when it is already formatted or carries no
/// number at all.
pub fn normalize_amount(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return expression.to_string();
    }

    if CANONICAL_WON.is_match(trimmed)
        || (trimmed.contains(',') && trimmed.contains(WON) && !has_magnitude_word(trimmed))
    {
        return trimmed.to_string();
    }

    match parse_korean_amount(trimmed) {
        Some(won) => format_won(won),
        None => expression.to_string(),
    }
}

/// Parse an amount expression into a won count.
///
/// Plain numbers without a unit follow the note-taking habit of the trade:
/// four digits or fewer are counted in 만 (10,000), six or more are already
/// won, and exactly five digits are taken as won.
pub fn parse_korean_amount(expression: &str) -> Option<u64> {
    let cleaned = expression.replace(',', "");
    let text = cleaned.trim();
    if text.is_empty() {
        return None;
    }

    if text.contains('억') {
        let caps = AMOUNT_EOK.captures(text)?;
        let eok = scale(&caps, EOK)?;
        let tail_start = caps.get(0).map(|m| m.end()).unwrap_or(text.len());
        return eok.checked_add(remainder(&text[tail_start..], &lower_units())?);
    }

    if let Some(won) = parse_units(text, &lower_units()) {
        return Some(won);
    }

    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let number: u64 = digits.parse().ok()?;
    match digits.len() {
        len if len >= 6 => Some(number),
        len if len <= 4 => number.checked_mul(MAN),
        _ => Some(number),
    }
}

/// Format a won count with thousands separators and the currency suffix.
pub fn format_won(won: u64) -> String {
    let digits = won.to_string();
    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3 + WON.len());

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(*c);
    }

    formatted.push_str(WON);
    formatted
}

/// Won count of an already formatted amount (`"1,234원"`).
pub fn parse_formatted_won(formatted: &str) -> Option<u64> {
    let trimmed = formatted.trim();
    if !CANONICAL_WON.is_match(trimmed) {
        return None;
    }
    trimmed
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()
}

/// Won count of a plain decimal number (`"10000000.0"`, `"1e7"`).
///
/// Fractions of a won are dropped; negative numbers give `None`.
pub fn parse_decimal_won(text: &str) -> Option<u64> {
    let text = text.trim();
    let value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()?;
    if value.is_sign_negative() {
        return None;
    }
    value.trunc().to_u64()
}

/// First matching unit, plus whatever smaller amount follows it
/// ("1만 2345원", "3천만 5백만").
fn parse_units(text: &str, units: &[(&'static Regex, u64)]) -> Option<u64> {
    for (i, (pattern, multiplier)) in units.iter().enumerate() {
        if let Some(caps) = pattern.captures(text) {
            let base = scale(&caps, *multiplier)?;
            let end = caps.get(0).map(|m| m.end()).unwrap_or(text.len());
            return base.checked_add(remainder(&text[end..], &units[i + 1..])?);
        }
    }
    None
}

/// Amount after a unit: bare digits are won, otherwise a smaller unit.
/// Anything else counts as nothing.
fn remainder(tail: &str, units: &[(&'static Regex, u64)]) -> Option<u64> {
    let rest = tail.trim();
    let rest = rest.strip_suffix(WON).unwrap_or(rest).trim();
    if rest.is_empty() {
        return Some(0);
    }
    if rest.chars().all(|c| c.is_ascii_digit()) {
        return rest.parse().ok();
    }
    Some(parse_units(tail, units).unwrap_or(0))
}

fn has_magnitude_word(text: &str) -> bool {
    text.contains('억') || text.contains('만') || text.contains('천')
}

/// Count in group 1 (default 1) times the multiplier.
fn scale(caps: &Captures<'_>, multiplier: u64) -> Option<u64> {
    let count = match caps.get(1) {
        Some(m) => Decimal::from_str(&m.as_str().replace(',', "")).ok()?,
        None => Decimal::ONE,
    };
    count.checked_mul(Decimal::from(multiplier))?.trunc().to_u64()
}

/// Amount extractor for whole notes.
///
/// Patterns are tried in order and the first hit wins: 억 (with an optional
/// 만-family tail), 천만, 백만, 만, comma grouped won, then plain won of seven
/// or more digits.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = ExtractionMatch<u64>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let candidates: [(&Regex, fn(&Captures<'_>) -> Option<u64>); 6] = [
            (&*NOTE_AMOUNT_EOK, eok_with_tail),
            (&*NOTE_AMOUNT_CHEONMAN, |caps| count(caps)?.checked_mul(CHEONMAN)),
            (&*NOTE_AMOUNT_BAEKMAN, |caps| count(caps)?.checked_mul(BAEKMAN)),
            (&*NOTE_AMOUNT_MAN, |caps| count(caps)?.checked_mul(MAN)),
            (&*NOTE_AMOUNT_GROUPED, count),
            (&*NOTE_AMOUNT_PLAIN, count),
        ];

        for (pattern, convert) in candidates {
            if let Some(caps) = pattern.captures(text) {
                let full_match = caps.get(0)?;
                let value = convert(&caps)?;
                return Some(
                    ExtractionMatch::new(value, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        None
    }
}

fn count(caps: &Captures<'_>) -> Option<u64> {
    caps.get(1)?.as_str().replace(',', "").parse().ok()
}

fn eok_with_tail(caps: &Captures<'_>) -> Option<u64> {
    let eok = scale(caps, EOK)?;
    let tail = match (caps.get(2), caps.get(3)) {
        (Some(n), Some(unit)) => {
            let n: u64 = n.as_str().replace(',', "").parse().ok()?;
            let unit: String = unit.as_str().chars().filter(|c| !c.is_whitespace()).collect();
            let multiplier = match unit.as_str() {
                "천만" => CHEONMAN,
                "백만" => BAEKMAN,
                _ => MAN,
            };
            n.checked_mul(multiplier)?
        }
        _ => 0,
    };
    eok.checked_add(tail)
}

/// Extract the amount of a note in won.
pub fn extract_amount(text: &str) -> Option<u64> {
    AmountExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_units() {
        assert_eq!(normalize_amount("1000만원"), "10,000,000원");
        assert_eq!(normalize_amount("500만"), "5,000,000원");
        assert_eq!(normalize_amount("3천만원"), "30,000,000원");
        assert_eq!(normalize_amount("15억"), "1,500,000,000원");
        assert_eq!(normalize_amount("2백만원"), "2,000,000원");
        assert_eq!(normalize_amount("5천원"), "5,000원");
        assert_eq!(normalize_amount("1.5억"), "150,000,000원");
    }

    #[test]
    fn test_normalize_eok_with_tail() {
        assert_eq!(normalize_amount("2억 3천만원"), "230,000,000원");
        assert_eq!(normalize_amount("2억 5000만"), "250,000,000원");
        assert_eq!(normalize_amount("1억"), "100,000,000원");
    }

    #[test]
    fn test_unit_without_count_defaults_to_one() {
        assert_eq!(normalize_amount("천만원"), "10,000,000원");
        assert_eq!(normalize_amount("백만"), "1,000,000원");
        assert_eq!(normalize_amount("만원"), "10,000원");
        assert_eq!(normalize_amount("억"), "100,000,000원");
    }

    #[test]
    fn test_plain_digits_heuristic() {
        assert_eq!(normalize_amount("1000"), "10,000,000원");
        assert_eq!(normalize_amount("5000000"), "5,000,000원");
        assert_eq!(normalize_amount("300000"), "300,000원");
        assert_eq!(normalize_amount("12345"), "12,345원");
    }

    #[test]
    fn test_already_formatted_is_unchanged() {
        assert_eq!(normalize_amount("230,000,000원"), "230,000,000원");
        assert_eq!(normalize_amount("5,000원"), "5,000원");
        assert_eq!(normalize_amount("500원"), "500원");
    }

    #[test]
    fn test_commas_inside_unit_expressions() {
        assert_eq!(normalize_amount("1,000만원"), "10,000,000원");
    }

    #[test]
    fn test_non_numeric_is_unchanged() {
        assert_eq!(normalize_amount("미정"), "미정");
        assert_eq!(normalize_amount(""), "");
        assert_eq!(normalize_amount("   "), "   ");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "1000만원", "500만", "3천만원", "15억", "2억 3천만원", "5000원", "1000",
            "5000000", "12345", "1.5억", "천만원", "미정", "타일공사 500만원",
        ];
        for input in inputs {
            let once = normalize_amount(input);
            assert_eq!(normalize_amount(&once), once, "{input}");
        }
    }

    #[test]
    fn test_remainder_after_unit() {
        assert_eq!(normalize_amount("1만 2345원"), "12,345원");
        assert_eq!(normalize_amount("5천 300원"), "5,300원");
        assert_eq!(normalize_amount("1억 2345"), "100,002,345원");
        assert_eq!(normalize_amount("1000만원 잔금"), "10,000,000원");
    }

    #[test]
    fn test_oversized_counts_do_not_panic() {
        assert_eq!(parse_korean_amount("99999999999999999999999999억"), None);
        assert_eq!(
            normalize_amount("99999999999999999999999999억"),
            "99999999999999999999999999억"
        );
        assert_eq!(parse_korean_amount("99999999999999999999999999만"), None);
        assert_eq!(extract_amount("북구청 잔금 99999999999999999999999999억"), None);
        assert_eq!(parse_korean_amount("1만 99999999999999999999999원"), None);
    }

    #[test]
    fn test_parse_decimal_won() {
        assert_eq!(parse_decimal_won("10000000.0"), Some(10_000_000));
        assert_eq!(parse_decimal_won("1500000.5"), Some(1_500_000));
        assert_eq!(parse_decimal_won("1e7"), Some(10_000_000));
        assert_eq!(parse_decimal_won("500"), Some(500));
        assert_eq!(parse_decimal_won("-5000"), None);
        assert_eq!(parse_decimal_won("500만"), None);
    }

    #[test]
    fn test_format_won() {
        assert_eq!(format_won(0), "0원");
        assert_eq!(format_won(999), "999원");
        assert_eq!(format_won(1_000), "1,000원");
        assert_eq!(format_won(230_000_000), "230,000,000원");
    }

    #[test]
    fn test_parse_formatted_won() {
        assert_eq!(parse_formatted_won("500원"), Some(500));
        assert_eq!(parse_formatted_won("10,000,000원"), Some(10_000_000));
        assert_eq!(parse_formatted_won("1000만원"), None);
        assert_eq!(parse_formatted_won(""), None);
    }

    #[test]
    fn test_extract_from_notes() {
        assert_eq!(extract_amount("북구청 방수 작업 끝나면 1000만원 잔금"), Some(10_000_000));
        assert_eq!(extract_amount("강남 아파트 2억 3천만원 계약"), Some(230_000_000));
        assert_eq!(extract_amount("자재비 3천만 원"), Some(30_000_000));
        assert_eq!(extract_amount("인건비 2백만원"), Some(2_000_000));
        assert_eq!(extract_amount("잔금 1,500,000원 입금"), Some(1_500_000));
        assert_eq!(extract_amount("잔금 12000000원"), Some(12_000_000));
        assert_eq!(extract_amount("도배 인건비 80만원"), Some(800_000));
        assert_eq!(extract_amount("내일 현금으로"), None);
    }

    #[test]
    fn test_extract_reports_source() {
        let found = AmountExtractor::new().extract("김사장 계약금 300만원 내일").unwrap();
        assert_eq!(found.source, "300만");
        assert_eq!(found.value, 3_000_000);
    }
}
