//! Lookup outcomes handed back to callers.

use serde::{Serialize, Serializer};

use crate::record::AddressRecord;

/// Why a lookup produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The input does not contain exactly eight digits.
    InvalidFormat,
    /// Well-formed input, but no provider knows the code.
    NotFound,
}

impl FailureReason {
    /// User-facing message for the failure.
    pub fn message(&self) -> &'static str {
        match self {
            FailureReason::InvalidFormat => "invalid postal code: expected 8 digits",
            FailureReason::NotFound => "postal code not found in any service",
        }
    }
}

/// A successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupHit {
    pub record: AddressRecord,
    pub served_from_cache: bool,
    /// Measured wall time of the lookup, cache hits included.
    pub elapsed_ms: u64,
}

/// Result of a lookup.
///
/// Serializes as `{"ok": true, "record": ..., "served_from_cache": ..., "elapsed_ms": ...}`
/// or `{"ok": false, "reason": "invalid_format" | "not_found"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(LookupHit),
    Failed(FailureReason),
}

impl LookupOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }

    pub fn hit(&self) -> Option<&LookupHit> {
        match self {
            LookupOutcome::Found(hit) => Some(hit),
            LookupOutcome::Failed(_) => None,
        }
    }

    pub fn record(&self) -> Option<&AddressRecord> {
        self.hit().map(|hit| &hit.record)
    }

    pub fn reason(&self) -> Option<FailureReason> {
        match self {
            LookupOutcome::Found(_) => None,
            LookupOutcome::Failed(reason) => Some(*reason),
        }
    }
}

#[derive(Serialize)]
struct WireOutcome<'a> {
    ok: bool,
    #[serde(flatten)]
    hit: Option<&'a LookupHit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<FailureReason>,
}

impl Serialize for LookupOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireOutcome { ok: self.is_ok(), hit: self.hit(), reason: self.reason() }.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ProviderId;

    fn sample_hit() -> LookupHit {
        LookupHit {
            record: AddressRecord {
                code: "92500000".parse().unwrap(),
                region: "RS".into(),
                city: "Guaíba".into(),
                street: String::new(),
                district: String::new(),
                source_provider: ProviderId::ViaCep,
            },
            served_from_cache: true,
            elapsed_ms: 0,
        }
    }

    #[test]
    fn test_found_wire_shape() {
        let outcome = LookupOutcome::Found(sample_hit());
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["served_from_cache"], true);
        assert_eq!(json["elapsed_ms"], 0);
        assert_eq!(json["record"]["city"], "Guaíba");
        assert!(json.get("reason").is_none());
    }

    #[test]
    fn test_failed_wire_shape() {
        let outcome = LookupOutcome::Failed(FailureReason::NotFound);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"ok": false, "reason": "not_found"}));
    }

    #[test]
    fn test_accessors() {
        let found = LookupOutcome::Found(sample_hit());
        assert!(found.is_ok());
        assert_eq!(found.record().unwrap().region, "RS");
        assert_eq!(found.reason(), None);

        let failed = LookupOutcome::Failed(FailureReason::InvalidFormat);
        assert!(!failed.is_ok());
        assert!(failed.record().is_none());
        assert_eq!(failed.reason(), Some(FailureReason::InvalidFormat));
    }
}
