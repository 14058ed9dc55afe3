//! Deterministic extraction used when the provider is unavailable.

use chrono::NaiveDate;
use tracing::debug;

use super::rules::{
    AmountExtractor, DueDateExtractor, FieldExtractor, PaymentMethodExtractor,
    PaymentTypeExtractor, SiteExtractor, WorkTypeExtractor,
};
use crate::models::fields::{
    AmountField, ExtractedFields, PAYMENT_METHOD_UNDECIDED, PAYMENT_TYPE_OTHER,
};

/// Pattern and keyword extractor for whole notes.
///
/// Never fails: fields it cannot find are left empty, except the payment
/// type and method which fall back to `기타` and `미정`.
#[derive(Debug, Clone, Copy)]
pub struct RuleBasedExtractor {
    due_date: DueDateExtractor,
}

impl RuleBasedExtractor {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            due_date: DueDateExtractor::new(today),
        }
    }

    pub fn extract(&self, text: &str) -> ExtractedFields {
        let site_name = SiteExtractor.extract(text).map(|m| m.value).unwrap_or_default();
        let work_type = WorkTypeExtractor.extract(text).map(|m| m.value).unwrap_or_default();
        let amount = AmountExtractor::new()
            .extract(text)
            .map(|m| AmountField::Won(m.value))
            .unwrap_or_default();
        let payment_type = PaymentTypeExtractor
            .extract(text)
            .map(|m| m.value)
            .unwrap_or_else(|| PAYMENT_TYPE_OTHER.to_string());
        let expected_date = self.due_date.extract(text).unwrap_or_default();
        let payment_method = PaymentMethodExtractor
            .extract(text)
            .map(|m| m.value)
            .unwrap_or_else(|| PAYMENT_METHOD_UNDECIDED.to_string());

        debug!(
            site = %site_name,
            work = %work_type,
            due = %expected_date,
            "rule-based extraction"
        );

        ExtractedFields {
            site_name,
            work_type,
            amount,
            payment_type,
            expected_date,
            payment_method,
            memo: text.to_string(),
            ..Default::default()
        }
    }
}
