//! Extraction through an OpenAI-compatible chat-completion provider.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::prompt::{build_prompt, SYSTEM_PROMPT};
use super::rules::patterns::CODE_FENCE;
use super::rules::{
    is_iso_date, parse_decimal_won, parse_korean_amount, DateResolver, FieldExtractor,
    PaymentMethodExtractor, PaymentTypeExtractor, SiteExtractor,
};
use crate::error::ProviderFailure;
use crate::models::config::ProviderConfig;
use crate::models::fields::{AmountField, ExtractedFields, WORK_COMPLETION};

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Requested response format, `{"type": "json_object"}` for extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// Body of a `/chat/completions` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// A chat-completion provider.
///
/// Implementations return the content of the first choice's message.
pub trait ChatBackend: Send + Sync {
    fn complete(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<String, ProviderFailure>> + Send;
}

/// Backend used when no provider is configured. Every call fails with
/// [`ProviderFailure::NotConfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackend;

impl ChatBackend for NoBackend {
    fn complete(
        &self,
        _request: &ChatRequest,
    ) -> impl Future<Output = Result<String, ProviderFailure>> + Send {
        std::future::ready(Err(ProviderFailure::NotConfigured(
            "no chat backend".to_string(),
        )))
    }
}

/// Extracts fields by asking a chat model for a JSON object.
#[derive(Debug)]
pub struct LlmExtractor<B> {
    backend: B,
    model: String,
    temperature: f32,
}

impl<B: ChatBackend> LlmExtractor<B> {
    pub fn new(backend: B, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            temperature: 0.1,
        }
    }

    pub fn from_config(backend: B, config: &ProviderConfig) -> Self {
        Self::new(backend, config.model.clone()).with_temperature(config.temperature)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request for `text`.
    pub fn request(&self, text: &str, today: NaiveDate) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_prompt(text, today)),
            ],
            temperature: self.temperature,
            response_format: Some(ResponseFormat::json_object()),
        }
    }

    /// Ask the provider for the fields of `text` and post-process them.
    pub async fn extract(
        &self,
        text: &str,
        today: NaiveDate,
    ) -> Result<ExtractedFields, ProviderFailure> {
        let request = self.request(text, today);
        debug!(model = %self.model, chars = text.chars().count(), "requesting extraction");

        let content = self.backend.complete(&request).await?;
        let fields = parse_payload(&content)?;

        info!(model = %self.model, site = %fields.site_name, "provider extraction succeeded");
        Ok(post_process(fields, text, today))
    }
}

/// Parse the provider's message content into fields.
///
/// Markdown code fences are stripped first. Anything but a JSON object is
/// rejected.
pub fn parse_payload(content: &str) -> Result<ExtractedFields, ProviderFailure> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ProviderFailure::EmptyContent);
    }

    let body = CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ProviderFailure::MalformedPayload(e.to_string()))?;

    if !value.is_object() {
        return Err(ProviderFailure::MalformedPayload(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }

    serde_json::from_value(value).map_err(|e| ProviderFailure::MalformedPayload(e.to_string()))
}

/// Repair provider output against the original note.
///
/// Amounts become won counts, due dates are resolved to ISO when possible and
/// otherwise kept as written, and blank site, payment type, payment method and
/// memo are backfilled from the note.
pub fn post_process(mut fields: ExtractedFields, text: &str, today: NaiveDate) -> ExtractedFields {
    if let AmountField::Text(raw) = &fields.amount {
        let raw = raw.trim();
        if !raw.is_empty() {
            let won = parse_decimal_won(raw).or_else(|| parse_korean_amount(raw));
            if let Some(won) = won {
                fields.amount = AmountField::Won(won);
            }
        }
    }

    let due = fields.expected_date.trim();
    if !due.is_empty() && due != WORK_COMPLETION && !is_iso_date(due) {
        let resolved = DateResolver::new(today).resolve(due);
        if !resolved.is_empty() {
            fields.expected_date = resolved;
        }
    }

    if fields.site_name.is_empty() {
        fields.site_name = if fields.location.is_empty() {
            SiteExtractor
                .extract(text)
                .map(|m| m.value)
                .unwrap_or_default()
        } else {
            fields.location.clone()
        };
    }

    if fields.payment_type.is_empty() {
        if let Some(found) = PaymentTypeExtractor.extract(text) {
            fields.payment_type = found.value;
        }
    }

    if fields.payment_method.is_empty() {
        if let Some(found) = PaymentMethodExtractor.extract(text) {
            fields.payment_method = found.value;
        }
    }

    if fields.memo.is_empty() {
        fields.memo = text.to_string();
    }

    fields
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
