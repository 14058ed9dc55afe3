//! Daily usage quota for provider calls and record saves.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SubmissionError;

/// Remaining count below which a warning is logged.
const LOW_REMAINING: u32 = 10;

/// Kinds of metered calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    LlmCalls,
    StoreSaves,
}

impl fmt::Display for UsageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UsageKind::LlmCalls => write!(f, "LLM call"),
            UsageKind::StoreSaves => write!(f, "record save"),
        }
    }
}

/// Per-day limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageLimits {
    pub llm_calls: u32,
    pub store_saves: u32,
}

impl Default for UsageLimits {
    fn default() -> Self {
        Self {
            llm_calls: 500,
            store_saves: 200,
        }
    }
}

impl UsageLimits {
    pub fn limit(&self, kind: UsageKind) -> u32 {
        match kind {
            UsageKind::LlmCalls => self.llm_calls,
            UsageKind::StoreSaves => self.store_saves,
        }
    }
}

/// Counts for a single day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DailyUsage {
    pub llm_calls: u32,
    pub store_saves: u32,
}

impl DailyUsage {
    fn get(&self, kind: UsageKind) -> u32 {
        match kind {
            UsageKind::LlmCalls => self.llm_calls,
            UsageKind::StoreSaves => self.store_saves,
        }
    }

    fn get_mut(&mut self, kind: UsageKind) -> &mut u32 {
        match kind {
            UsageKind::LlmCalls => &mut self.llm_calls,
            UsageKind::StoreSaves => &mut self.store_saves,
        }
    }
}

/// In-memory usage counter for the current day.
///
/// Counts reset the first time the ledger is touched on a new date. Nothing
/// is persisted.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    limits: UsageLimits,
    day: Option<NaiveDate>,
    usage: DailyUsage,
}

impl UsageLedger {
    pub fn new(limits: UsageLimits) -> Self {
        Self {
            limits,
            day: None,
            usage: DailyUsage::default(),
        }
    }

    pub fn limits(&self) -> &UsageLimits {
        &self.limits
    }

    /// Counts recorded for `today`.
    pub fn usage(&self, today: NaiveDate) -> DailyUsage {
        match self.day {
            Some(day) if day == today => self.usage,
            _ => DailyUsage::default(),
        }
    }

    /// Calls of `kind` still allowed on `today`.
    pub fn remaining(&self, kind: UsageKind, today: NaiveDate) -> u32 {
        self.limits
            .limit(kind)
            .saturating_sub(self.usage(today).get(kind))
    }

    /// Record one call of `kind`, or refuse it if the limit is reached.
    ///
    /// Returns the number of calls left after this one.
    pub fn try_consume(&mut self, kind: UsageKind, today: NaiveDate) -> Result<u32, SubmissionError> {
        if self.day != Some(today) {
            self.day = Some(today);
            self.usage = DailyUsage::default();
        }

        let limit = self.limits.limit(kind);
        let used = self.usage.get_mut(kind);
        if *used >= limit {
            warn!(%kind, limit, "daily limit reached");
            return Err(SubmissionError::QuotaExceeded { kind, limit });
        }

        *used += 1;
        let remaining = limit - *used;
        if remaining < LOW_REMAINING {
            warn!(%kind, remaining, "daily limit nearly reached");
        }
        Ok(remaining)
    }
}
