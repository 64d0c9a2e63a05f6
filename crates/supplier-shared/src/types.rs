//! Common types

use serde::{Deserialize, Serialize};

/// A single `type`/`value` claim pair as presented to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPair {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl ClaimPair {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}
