//! Record store contract.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::{PersistenceFailure, StoreError};
use crate::models::record::CanonicalRecord;

/// Outcome of a store call that reached the store.
///
/// On success `message` holds the page URL (or id); otherwise the store's
/// error text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreResponse {
    pub status: u16,
    pub message: String,
}

impl StoreResponse {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The saved location, or the failure as an error.
    pub fn into_result(self) -> Result<String, PersistenceFailure> {
        if self.is_success() {
            Ok(self.message)
        } else {
            Err(PersistenceFailure {
                status: Some(self.status),
                message: self.message,
            })
        }
    }
}

/// Destination for canonical records.
///
/// A call writes at most one record. Callers never retry it.
pub trait RecordStore: Send + Sync {
    fn save(
        &self,
        record: &CanonicalRecord,
    ) -> impl Future<Output = Result<StoreResponse, StoreError>> + Send;
}
