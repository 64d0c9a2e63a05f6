// ============================================================================
// Supplier Core - Supplier Entity
// File: crates/supplier-core/src/domain/supplier.rs
// Description: Supplier record and its inbound payload
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Persisted supplier record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub active: bool,
}

/// Supplier payload as received on create/update, before validation.
///
/// `name` and `document` stay optional so a missing field surfaces as a
/// field-level validation error instead of a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub document: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl SupplierDraft {
    pub fn new(name: impl Into<String>, document: impl Into<String>, active: bool) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            document: Some(document.into()),
            active,
        }
    }

    /// Identifier to persist under: the caller's id, or a fresh one when it is
    /// absent or nil.
    pub fn resolve_id(&self) -> Uuid {
        match self.id {
            Some(id) if !id.is_nil() => id,
            _ => Uuid::new_v4(),
        }
    }

    /// Builds the record to persist, fields exactly as submitted.
    /// Call only after validation has passed.
    pub fn into_supplier(self, id: Uuid) -> Supplier {
        Supplier {
            id,
            name: self.name.unwrap_or_default(),
            document: self.document.unwrap_or_default(),
            active: self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_id_generates_when_missing_or_nil() {
        let mut draft = SupplierDraft::new("Acme Ltd", "12345678901234", true);
        assert!(!draft.resolve_id().is_nil());

        draft.id = Some(Uuid::nil());
        assert!(!draft.resolve_id().is_nil());

        let fixed = Uuid::new_v4();
        draft.id = Some(fixed);
        assert_eq!(draft.resolve_id(), fixed);
    }

    #[test]
    fn test_into_supplier_keeps_fields_verbatim() {
        let id = Uuid::new_v4();
        let supplier = SupplierDraft::new(" Acme Ltd ", "12345678901234", false).into_supplier(id);
        assert_eq!(supplier.id, id);
        assert_eq!(supplier.name, " Acme Ltd ");
        assert_eq!(supplier.document, "12345678901234");
        assert!(!supplier.active);
    }

    #[test]
    fn test_draft_deserializes_with_missing_fields() {
        let draft: SupplierDraft = serde_json::from_str(r#"{"name":"Acme Ltd"}"#).unwrap();
        assert_eq!(draft.name.as_deref(), Some("Acme Ltd"));
        assert_eq!(draft.document, None);
        assert!(!draft.active);
        assert_eq!(draft.id, None);
    }
}
