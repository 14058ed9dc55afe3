//! Keyword-table extractors: site, work type, payment type and method, due date.

use chrono::NaiveDate;

use super::dates::DateResolver;
use super::patterns::{SITE_REGEXES, WORK_GENERIC};
use super::{first_keyword, ExtractionMatch, FieldExtractor};
use crate::models::fields::WORK_COMPLETION;

/// Work keywords and the category they map to, in priority order.
pub const WORK_TYPES: &[(&str, &str)] = &[
    ("방수", "방수공사"),
    ("미장", "미장공사"),
    ("조적", "조적공사"),
    ("타일", "타일공사"),
    ("인테리어", "인테리어"),
    ("도색", "도색작업"),
    ("페인트", "페인트작업"),
    ("전기", "전기공사"),
    ("설비", "설비공사"),
    ("철근", "철근작업"),
    ("도배", "도배작업"),
    ("장판", "장판작업"),
    ("샷시", "샷시공사"),
    ("유리", "유리공사"),
    ("목공", "목공작업"),
    ("철거", "철거작업"),
    ("청소", "청소작업"),
];

/// Payment type keywords, spelling variants included.
pub const PAYMENT_TYPES: &[(&str, &str)] = &[
    ("계약금", "계약금"),
    ("착수금", "계약금"),
    ("선금", "계약금"),
    ("중도금", "중도금"),
    ("중도 금", "중도금"),
    ("잔금", "잔금"),
    ("잔 금", "잔금"),
    ("완료금", "잔금"),
    ("준공금", "잔금"),
    ("자재비", "자재비"),
    ("자재 비", "자재비"),
    ("자재값", "자재비"),
    ("자재 값", "자재비"),
    ("인건비", "인건비"),
    ("인건 비", "인건비"),
    ("노무비", "인건비"),
    ("일당", "인건비"),
    ("품값", "인건비"),
    ("품삯", "인건비"),
];

/// Payment method keywords.
pub const PAYMENT_METHODS: &[(&str, &str)] = &[
    ("현금", "현금"),
    ("캐시", "현금"),
    ("계좌", "계좌이체"),
    ("이체", "계좌이체"),
    ("송금", "계좌이체"),
    ("입금", "계좌이체"),
    ("카드", "카드"),
    ("체크카드", "카드"),
    ("신용카드", "카드"),
    ("외상", "외상"),
    ("후불", "외상"),
];

/// Phrases meaning "once the work is finished".
pub const COMPLETION_PHRASES: &[&str] = &["끝나면", "완료되면", "완료후", "완료 후", "끝나고"];

/// Site or counterparty name by suffix (구청, 아파트, 건설, 사장, ...).
#[derive(Debug, Default)]
pub struct SiteExtractor;

impl FieldExtractor for SiteExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        SITE_REGEXES.iter().find_map(|pattern| {
            let m = pattern.captures(text)?.get(1)?;
            Some(
                ExtractionMatch::new(m.as_str().trim().to_string(), m.as_str())
                    .with_position(m.start(), m.end()),
            )
        })
    }
}

/// Work category from the keyword table, else `<word>작업`.
#[derive(Debug, Default)]
pub struct WorkTypeExtractor;

impl FieldExtractor for WorkTypeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if let Some(found) = first_keyword(WORK_TYPES, text) {
            return Some(found);
        }

        let caps = WORK_GENERIC.captures(text)?;
        let full_match = caps.get(0)?;
        Some(
            ExtractionMatch::new(format!("{}작업", &caps[1]), full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }
}

/// Payment type (계약금, 중도금, 잔금, 자재비, 인건비).
#[derive(Debug, Default)]
pub struct PaymentTypeExtractor;

impl FieldExtractor for PaymentTypeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_keyword(PAYMENT_TYPES, text)
    }
}

/// Payment method (현금, 계좌이체, 카드, 외상).
#[derive(Debug, Default)]
pub struct PaymentMethodExtractor;

impl FieldExtractor for PaymentMethodExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        first_keyword(PAYMENT_METHODS, text)
    }
}

/// Expected payment date of a note.
///
/// Completion phrases give the [`WORK_COMPLETION`] sentinel instead of a date.
#[derive(Debug, Clone, Copy)]
pub struct DueDateExtractor {
    resolver: DateResolver,
}

impl DueDateExtractor {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            resolver: DateResolver::new(today),
        }
    }
}

impl FieldExtractor for DueDateExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        if COMPLETION_PHRASES.iter().any(|phrase| text.contains(phrase)) {
            return Some(WORK_COMPLETION.to_string());
        }

        let resolved = self.resolver.scan(text);
        (!resolved.is_empty()).then_some(resolved)
    }
}
