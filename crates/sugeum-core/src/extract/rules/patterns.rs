//! Common regex patterns for Korean payment notes.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Dates
    pub static ref ISO_DATE_EXACT: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}$"
    ).unwrap();

    pub static ref DAYS_LATER: Regex = Regex::new(
        r"(\d+)\s*일\s*(?:후|뒤)"
    ).unwrap();

    pub static ref DAYS_BEFORE: Regex = Regex::new(
        r"(\d+)\s*일\s*전"
    ).unwrap();

    pub static ref DATE_KOREAN_FULL: Regex = Regex::new(
        r"(\d{4})\s*년\s*(\d{1,2})\s*월\s*(\d{1,2})\s*일"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"(?:^|\D)(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})(?:\D|$)"
    ).unwrap();

    pub static ref DATE_KOREAN_MD: Regex = Regex::new(
        r"(?:^|\D)(\d{1,2})\s*월\s*(\d{1,2})"
    ).unwrap();

    pub static ref DATE_NUMERIC_MD: Regex = Regex::new(
        r"(?:^|\D)(\d{1,2})[/\-](\d{1,2})(?:\D|$)"
    ).unwrap();

    // Amounts: a count, optionally comma grouped or decimal, before a unit
    pub static ref AMOUNT_EOK: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)?\s*억"
    ).unwrap();

    pub static ref AMOUNT_CHEONMAN: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)?\s*천\s*만"
    ).unwrap();

    pub static ref AMOUNT_BAEKMAN: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)?\s*백\s*만"
    ).unwrap();

    pub static ref AMOUNT_MAN: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)?\s*만"
    ).unwrap();

    pub static ref AMOUNT_CHEON: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)?\s*천"
    ).unwrap();

    pub static ref CANONICAL_WON: Regex = Regex::new(
        r"^\d{1,3}(?:,\d{3})*원$"
    ).unwrap();

    /// Amount expressions embedded in free text, for in-place normalization.
    pub static ref AMOUNT_IN_TEXT: Regex = Regex::new(
        r"\d+(?:\.\d+)?\s*(?:억(?:\s*\d+\s*(?:천\s*만|백\s*만|만))?|천\s*만|백\s*만|만)\s*원?"
    ).unwrap();

    // Amounts in notes, tried in order by the rule extractor
    pub static ref NOTE_AMOUNT_EOK: Regex = Regex::new(
        r"(\d+(?:\.\d+)?)\s*억(?:\s*(\d{1,3}(?:,\d{3})+|\d+)\s*(천\s*만|백\s*만|만))?"
    ).unwrap();

    pub static ref NOTE_AMOUNT_CHEONMAN: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+)\s*천\s*만"
    ).unwrap();

    pub static ref NOTE_AMOUNT_BAEKMAN: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+)\s*백\s*만"
    ).unwrap();

    pub static ref NOTE_AMOUNT_MAN: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+|\d+)\s*만"
    ).unwrap();

    pub static ref NOTE_AMOUNT_GROUPED: Regex = Regex::new(
        r"(\d{1,3}(?:,\d{3})+)\s*원"
    ).unwrap();

    pub static ref NOTE_AMOUNT_PLAIN: Regex = Regex::new(
        r"(\d{7,})\s*원"
    ).unwrap();

    // Generic "<word> 작업"
    pub static ref WORK_GENERIC: Regex = Regex::new(
        r"(\S+)\s*작업"
    ).unwrap();

    // Markdown code fences around provider payloads
    pub static ref CODE_FENCE: Regex = Regex::new(
        r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$"
    ).unwrap();
}

/// Site and counterparty suffix patterns, in priority order.
pub static SITE_PATTERNS: &[&str] = &[
    r"(\S+구청)",
    r"(\S+시청)",
    r"(\S+청사)",
    r"(\S+\s?아파트)",
    r"(\S+\s?현장)",
    r"(\S+\s?빌딩)",
    r"(\S+\s?오피스텔)",
    r"(\S+\s?빌라)",
    r"(\S+\s?주택)",
    r"(\S+건설)",
    r"(\S+건축)",
    r"(\S+시공)",
    r"(\S+인테리어)",
    r"(\S+사장)",
];

lazy_static! {
    pub static ref SITE_REGEXES: Vec<Regex> = SITE_PATTERNS
        .iter()
        .map(|pattern| Regex::new(pattern).unwrap())
        .collect();
}
