//! Analyze-then-confirm workflow around a single note.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{PersistenceFailure, ProviderFailure, SubmissionError};
use crate::extract::{
    ChatBackend, Extraction, ExtractionSource, LlmExtractor, NoBackend, RuleBasedExtractor,
};
use crate::models::fields::ExtractedFields;
use crate::models::record::CanonicalRecord;
use crate::normalize::RecordNormalizer;
use crate::sanitize::{sanitize_input, MAX_INPUT_CHARS};
use crate::store::RecordStore;
use crate::usage::{UsageKind, UsageLedger};

/// Turns notes into draft submissions, using the provider when one is
/// configured and the rules otherwise.
#[derive(Debug)]
pub struct Assistant<B = NoBackend> {
    llm: Option<LlmExtractor<B>>,
    max_input_chars: usize,
}

impl Assistant<NoBackend> {
    /// An assistant that never calls a provider.
    pub fn rules_only() -> Self {
        Self {
            llm: None,
            max_input_chars: MAX_INPUT_CHARS,
        }
    }
}

impl<B: ChatBackend> Assistant<B> {
    pub fn new(llm: LlmExtractor<B>) -> Self {
        Self {
            llm: Some(llm),
            max_input_chars: MAX_INPUT_CHARS,
        }
    }

    pub fn with_max_input_chars(mut self, max_input_chars: usize) -> Self {
        self.max_input_chars = max_input_chars;
        self
    }

    pub fn uses_provider(&self) -> bool {
        self.llm.is_some()
    }

    /// Extract fields from already sanitized text.
    ///
    /// Provider failures are logged and answered with the rule-based result,
    /// so this never fails.
    pub async fn extract(&self, text: &str, today: NaiveDate) -> Extraction {
        let reason = match &self.llm {
            Some(llm) => match llm.extract(text, today).await {
                Ok(fields) => {
                    return Extraction {
                        fields,
                        source: ExtractionSource::Llm,
                    };
                }
                Err(failure) => {
                    warn!(error = %failure, "provider extraction failed, falling back to rules");
                    failure
                }
            },
            None => ProviderFailure::NotConfigured("rules-only mode".to_string()),
        };

        Extraction {
            fields: RuleBasedExtractor::new(today).extract(text),
            source: ExtractionSource::Rules { reason },
        }
    }

    /// Sanitize, extract and normalize a note into a draft submission.
    ///
    /// One LLM quota unit is used when a provider is configured, even if the
    /// call ends in a fallback.
    pub async fn analyze(
        &self,
        text: &str,
        ledger: &mut UsageLedger,
        today: NaiveDate,
    ) -> Result<Analysis, SubmissionError> {
        let text = sanitize_input(text, self.max_input_chars);
        if text.is_empty() {
            return Err(SubmissionError::EmptyInput);
        }

        if self.uses_provider() {
            ledger.try_consume(UsageKind::LlmCalls, today)?;
        }

        let Extraction { fields, source } = self.extract(&text, today).await;
        let record = RecordNormalizer::new(today).normalize(&fields);
        info!(source = source.label(), who = %record.who, how = %record.how, "note analyzed");

        Ok(Analysis {
            text,
            fields,
            source,
            submission: Submission::new(record),
        })
    }
}

/// Result of analyzing one note.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The sanitized note.
    pub text: String,
    pub fields: ExtractedFields,
    pub source: ExtractionSource,
    pub submission: Submission,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Draft,
    Saved { location: String },
}

/// A record waiting for confirmation, persisted at most once.
#[derive(Debug, Clone)]
pub struct Submission {
    record: CanonicalRecord,
    state: SubmissionState,
}

impl Submission {
    pub fn new(record: CanonicalRecord) -> Self {
        Self {
            record,
            state: SubmissionState::Draft,
        }
    }

    pub fn record(&self) -> &CanonicalRecord {
        &self.record
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_saved(&self) -> bool {
        matches!(self.state, SubmissionState::Saved { .. })
    }

    /// Apply a user correction and renormalize the record.
    pub fn edit<F>(&mut self, today: NaiveDate, apply: F) -> Result<(), SubmissionError>
    where
        F: FnOnce(&mut CanonicalRecord),
    {
        if self.is_saved() {
            return Err(SubmissionError::AlreadySaved);
        }
        apply(&mut self.record);
        self.record = RecordNormalizer::new(today).renormalize(&self.record);
        Ok(())
    }

    /// Persist the record with a single store call.
    ///
    /// On failure the submission stays a draft and may be saved again.
    /// Returns the saved location.
    pub async fn save<S: RecordStore>(
        &mut self,
        store: &S,
        ledger: &mut UsageLedger,
        today: NaiveDate,
    ) -> Result<String, SubmissionError> {
        if self.is_saved() {
            return Err(SubmissionError::AlreadySaved);
        }
        ledger.try_consume(UsageKind::StoreSaves, today)?;

        let title = self.record.title();
        let response = store.save(&self.record).await.map_err(|e| PersistenceFailure {
            status: None,
            message: e.to_string(),
        });

        let location = match response.and_then(|response| response.into_result()) {
            Ok(location) => location,
            Err(failure) => {
                warn!(title = %title, error = %failure, "record was not saved");
                return Err(failure.into());
            }
        };

        info!(title = %title, location = %location, "record saved");
        self.state = SubmissionState::Saved {
            location: location.clone(),
        };
        Ok(location)
    }
}
