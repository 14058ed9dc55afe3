//! Canonical six-field ledger record (who/what/when/where/why/how).

use serde::{Deserialize, Serialize};

/// Title used when neither a site nor a location is known.
pub const PLACEHOLDER_TITLE: &str = "새 기록";

/// The record shape persisted to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalRecord {
    /// Site or counterparty. Never empty once normalized.
    pub who: String,

    /// Work description with the payment type in parentheses.
    pub what: String,

    /// ISO `YYYY-MM-DD` date, or empty when unknown.
    pub when: String,

    /// Site location. The notes do not separate it from `who`.
    #[serde(rename = "where")]
    pub place: String,

    /// Payment type.
    pub why: String,

    /// Formatted amount (`10,000,000원`).
    pub how: String,

    /// Date expression as the user wrote it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when_display: Option<String>,

    /// `what` before amount expressions inside it were normalized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_display: Option<String>,

    /// Formatted amount for display.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_amount: Option<String>,

    /// Unformatted amount digits, for editing.
    pub amount_input: String,

    /// Work category.
    pub work_type: String,

    /// Payment method.
    pub payment_method: String,

    /// Original note.
    pub memo: String,
}

impl CanonicalRecord {
    /// Title for persistence: `who`, else `where`, else the placeholder.
    pub fn title(&self) -> String {
        let who = self.who.trim();
        if !who.is_empty() {
            return who.to_string();
        }
        let place = self.place.trim();
        if !place.is_empty() {
            return place.to_string();
        }
        PLACEHOLDER_TITLE.to_string()
    }

    /// The date to persist, if any.
    pub fn date(&self) -> Option<&str> {
        let when = self.when.trim();
        (!when.is_empty()).then_some(when)
    }

    /// Human-readable date: the original expression when one was kept.
    pub fn when_for_display(&self) -> &str {
        match &self.when_display {
            Some(display) if !display.is_empty() => display,
            _ => &self.when,
        }
    }
}
