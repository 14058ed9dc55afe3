//! Mapping of extracted fields onto the canonical six-field record.

use chrono::NaiveDate;
use regex::Captures;

use crate::extract::rules::patterns::AMOUNT_IN_TEXT;
use crate::extract::rules::{
    format_won, is_iso_date, normalize_amount, parse_formatted_won, DateResolver,
};
use crate::models::fields::{AmountField, ExtractedFields};
use crate::models::record::{CanonicalRecord, PLACEHOLDER_TITLE};

/// Builds [`CanonicalRecord`]s from extracted fields.
///
/// `normalize` followed by any number of `renormalize` calls gives the same
/// record as `normalize` alone.
#[derive(Debug, Clone, Copy)]
pub struct RecordNormalizer {
    resolver: DateResolver,
}

impl RecordNormalizer {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            resolver: DateResolver::new(today),
        }
    }

    pub fn normalize(&self, fields: &ExtractedFields) -> CanonicalRecord {
        let site = first_filled(&[&fields.site_name, &fields.location]);
        let (what, what_display) = normalize_inline_amounts(&compose_what(fields));
        let (when, when_display) = self.resolve_when(&fields.expected_date);

        let how = match &fields.amount {
            AmountField::Won(won) => format_won(*won),
            AmountField::Text(text) => normalize_amount(text).trim().to_string(),
        };
        let amount_input = parse_formatted_won(&how)
            .map(|won| won.to_string())
            .unwrap_or_else(|| fields.amount.as_input());

        CanonicalRecord {
            who: or_placeholder(&site),
            what,
            when,
            place: site,
            why: fields.payment_type.trim().to_string(),
            display_amount: (!how.is_empty()).then(|| how.clone()),
            how,
            when_display,
            what_display,
            amount_input,
            work_type: fields.work_type.trim().to_string(),
            payment_method: fields.payment_method.trim().to_string(),
            memo: fields.memo.clone(),
        }
    }

    /// Re-apply the rules to a record, typically after the user edited it.
    pub fn renormalize(&self, record: &CanonicalRecord) -> CanonicalRecord {
        let (what, changed_from) = normalize_inline_amounts(&record.what);
        let what_display = changed_from.or_else(|| record.what_display.clone());

        let when = record.when.trim();
        let (when, when_display) = if when.is_empty() || is_iso_date(when) {
            (when.to_string(), record.when_display.clone())
        } else {
            self.resolve_when(when)
        };

        let how = normalize_amount(&record.how).trim().to_string();
        let amount_input = parse_formatted_won(&how)
            .map(|won| won.to_string())
            .unwrap_or_else(|| record.amount_input.clone());

        CanonicalRecord {
            who: or_placeholder(&first_filled(&[&record.who, &record.place])),
            what,
            when,
            place: record.place.trim().to_string(),
            why: record.why.trim().to_string(),
            display_amount: (!how.is_empty()).then(|| how.clone()),
            how,
            when_display,
            what_display,
            amount_input,
            work_type: record.work_type.trim().to_string(),
            payment_method: record.payment_method.trim().to_string(),
            memo: record.memo.clone(),
        }
    }

    /// ISO date plus the expression as written.
    fn resolve_when(&self, expression: &str) -> (String, Option<String>) {
        let expression = expression.trim();
        if expression.is_empty() {
            return (String::new(), None);
        }
        (self.resolver.resolve(expression), Some(expression.to_string()))
    }
}

/// `"<work> (<payment type>)"`, or the memo when both are blank.
fn compose_what(fields: &ExtractedFields) -> String {
    let mut parts = Vec::new();
    let work = fields.work_type.trim();
    if !work.is_empty() {
        parts.push(work.to_string());
    }
    let payment = fields.payment_type.trim();
    if !payment.is_empty() {
        parts.push(format!("({})", payment));
    }

    if parts.is_empty() {
        fields.memo.trim().to_string()
    } else {
        parts.join(" ")
    }
}

/// Normalize amount expressions inside free text.
///
/// Returns the new text and, if anything changed, the text before.
fn normalize_inline_amounts(text: &str) -> (String, Option<String>) {
    let replaced = AMOUNT_IN_TEXT.replace_all(text, |caps: &Captures<'_>| {
        let matched = &caps[0];
        let amount = matched.trim_end();
        format!("{}{}", normalize_amount(amount), &matched[amount.len()..])
    });

    if replaced == text {
        (text.to_string(), None)
    } else {
        (replaced.into_owned(), Some(text.to_string()))
    }
}

fn first_filled(candidates: &[&String]) -> String {
    candidates
        .iter()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn or_placeholder(value: &str) -> String {
    if value.is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        value.to_string()
    }
}
