//! Rule-based field extractors for Korean payment notes.

pub mod amounts;
pub mod dates;
pub mod keywords;
pub mod patterns;

pub use amounts::{
    extract_amount, format_won, normalize_amount, parse_decimal_won, parse_formatted_won,
    parse_korean_amount,
    AmountExtractor,
};
pub use dates::{is_iso_date, resolve_korean_date, DateResolver, ISO_FORMAT};
pub use keywords::{
    DueDateExtractor, PaymentMethodExtractor, PaymentTypeExtractor, SiteExtractor,
    WorkTypeExtractor,
};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A value found in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// First entry of an ordered keyword table whose keyword occurs in `text`.
pub(crate) fn first_keyword<'a>(
    table: &'a [(&'a str, &'a str)],
    text: &str,
) -> Option<ExtractionMatch<String>> {
    table.iter().find_map(|(keyword, value)| {
        text.find(keyword).map(|start| {
            ExtractionMatch::new(value.to_string(), *keyword)
                .with_position(start, start + keyword.len())
        })
    })
}
