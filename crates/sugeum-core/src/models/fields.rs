//! Raw fields extracted from a payment note.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::extract::rules::parse_decimal_won;

/// Sentinel used when payment is due "when the work is finished".
pub const WORK_COMPLETION: &str = "작업 완료 후";

/// Payment type used when none could be identified.
pub const PAYMENT_TYPE_OTHER: &str = "기타";

/// Payment method used when none could be identified.
pub const PAYMENT_METHOD_UNDECIDED: &str = "미정";

/// Fields pulled out of a single note.
///
/// Absent values are always the empty string, never missing or null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFields {
    /// Site or counterparty name (북구청, 강남 아파트, 김사장).
    #[serde(alias = "who", deserialize_with = "lenient_string")]
    pub site_name: String,

    /// Work category (방수공사, 타일공사, ...).
    #[serde(deserialize_with = "lenient_string")]
    pub work_type: String,

    /// Amount, normalized to won when possible.
    pub amount: AmountField,

    /// Payment type (계약금, 중도금, 잔금, 자재비, 인건비, 기타).
    #[serde(deserialize_with = "lenient_string")]
    pub payment_type: String,

    /// Expected payment date, ISO when resolved.
    #[serde(alias = "when", deserialize_with = "lenient_string")]
    pub expected_date: String,

    /// Payment method (현금, 계좌이체, 카드, 외상, 미정).
    #[serde(deserialize_with = "lenient_string")]
    pub payment_method: String,

    /// Free-form memo, usually the whole note.
    #[serde(deserialize_with = "lenient_string")]
    pub memo: String,

    /// Location, when the provider reports it apart from the site.
    #[serde(rename = "where", deserialize_with = "lenient_string")]
    pub location: String,

    /// Reason for the payment.
    #[serde(rename = "why", deserialize_with = "lenient_string")]
    pub reason: String,
}

/// Amount as extracted: a won count, or text that could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AmountField {
    /// Integer count of won.
    Won(u64),
    /// Unnormalized expression; empty when absent.
    Text(String),
}

impl Default for AmountField {
    fn default() -> Self {
        AmountField::Text(String::new())
    }
}

impl AmountField {
    /// Whether no amount was found.
    pub fn is_empty(&self) -> bool {
        matches!(self, AmountField::Text(s) if s.trim().is_empty())
    }

    /// The won count, if normalized.
    pub fn won(&self) -> Option<u64> {
        match self {
            AmountField::Won(won) => Some(*won),
            AmountField::Text(_) => None,
        }
    }

    /// Plain text form: digits for won amounts, the raw text otherwise.
    pub fn as_input(&self) -> String {
        match self {
            AmountField::Won(won) => won.to_string(),
            AmountField::Text(text) => text.clone(),
        }
    }
}

impl<'de> Deserialize<'de> for AmountField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::Number(n) => match n.as_u64().or_else(|| parse_decimal_won(&n.to_string())) {
                Some(won) => AmountField::Won(won),
                None => AmountField::Text(n.to_string()),
            },
            other => AmountField::Text(value_to_string(other)),
        })
    }
}

impl ExtractedFields {
    /// Names of every field, in serialization order.
    pub const KEYS: [&'static str; 9] = [
        "site_name",
        "work_type",
        "amount",
        "payment_type",
        "expected_date",
        "payment_method",
        "memo",
        "where",
        "why",
    ];
}

/// Accept strings, numbers, booleans and null; null becomes "".
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(value))
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_lenient_values() {
        let json = r#"{
            "site_name": "북구청",
            "work_type": null,
            "amount": 10000000,
            "payment_type": "잔금",
            "expected_date": 20250101
        }"#;

        let fields: ExtractedFields = serde_json::from_str(json).unwrap();

        assert_eq!(fields.site_name, "북구청");
        assert_eq!(fields.work_type, "");
        assert_eq!(fields.amount, AmountField::Won(10_000_000));
        assert_eq!(fields.expected_date, "20250101");
        assert_eq!(fields.memo, "");
        assert_eq!(fields.location, "");
    }

    #[test]
    fn test_deserialize_float_amounts() {
        let whole: ExtractedFields = serde_json::from_str(r#"{"amount": 10000000.0}"#).unwrap();
        assert_eq!(whole.amount, AmountField::Won(10_000_000));

        let negative: ExtractedFields = serde_json::from_str(r#"{"amount": -500.0}"#).unwrap();
        assert_eq!(negative.amount, AmountField::Text("-500.0".to_string()));
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"{"who": "김사장", "when": "내일", "where": "판교", "amount": "500만원"}"#;

        let fields: ExtractedFields = serde_json::from_str(json).unwrap();

        assert_eq!(fields.site_name, "김사장");
        assert_eq!(fields.expected_date, "내일");
        assert_eq!(fields.location, "판교");
        assert_eq!(fields.amount, AmountField::Text("500만원".to_string()));
    }

    #[test]
    fn test_serialized_keys_are_complete() {
        let value = serde_json::to_value(ExtractedFields::default()).unwrap();
        let object = value.as_object().unwrap();

        for key in ExtractedFields::KEYS {
            assert_eq!(object.get(key), Some(&Value::String(String::new())), "{key}");
        }
    }

    #[test]
    fn test_amount_field_helpers() {
        assert!(AmountField::default().is_empty());
        assert!(!AmountField::Won(0).is_empty());
        assert_eq!(AmountField::Won(5_000_000).as_input(), "5000000");
        assert_eq!(AmountField::Won(5_000_000).won(), Some(5_000_000));
        assert_eq!(AmountField::Text("미정".into()).won(), None);
    }
}
