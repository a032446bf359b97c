//! Event normalization: raw wire frames → canonical records.
//!
//! The server's event vocabulary varies (`CRY_DETECTED` vs `crying_alert`)
//! and its payload is untyped JSON. This boundary canonicalizes the event
//! name, validates the payload into a [`HealthReading`], and pairs the
//! alert fields — failing closed on any mismatch so loosely-typed data never
//! propagates past this point.

use cradle_core::{AlertPayload, CanonicalEvent, HealthReading, NormalizedMessage, WireMessage};

use crate::errors::NormalizeError;

/// Normalize a raw inbound text frame.
///
/// Errors mean the frame must be dropped (and logged by the caller); a
/// rejected frame is never dispatched.
pub fn normalize(raw: &str) -> Result<NormalizedMessage, NormalizeError> {
    let wire: WireMessage = serde_json::from_str(raw)?;
    normalize_wire(wire)
}

/// Normalize an already-parsed wire message.
pub fn normalize_wire(wire: WireMessage) -> Result<NormalizedMessage, NormalizeError> {
    let event = CanonicalEvent::from_wire(&wire.event);

    let data: HealthReading = serde_json::from_value(wire.data)
        .map_err(|e| NormalizeError::Schema(format!("{}: {e}", event.as_str())))?;

    let alert = match (wire.alert, wire.severity) {
        (Some(message), Some(severity)) => Some(AlertPayload { message, severity }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(NormalizeError::Schema("alert without severity".into()));
        }
        (None, Some(_)) => {
            return Err(NormalizeError::Schema("severity without alert".into()));
        }
    };

    Ok(NormalizedMessage { event, data, alert })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cradle_core::Severity;

    fn data_json() -> &'static str {
        r#"{"id": 7, "temperature": 36.8, "humidity": 60.0,
            "cry_detected": true, "sick_detected": false,
            "created_at": "2026-08-07T10:00:00Z"}"#
    }

    #[test]
    fn cry_detected_frame_normalizes_to_crying_alert() {
        let raw = format!(
            r#"{{"event": "CRY_DETECTED", "data": {}, "alert": "Bé đang khóc", "severity": "warning"}}"#,
            data_json()
        );
        let msg = normalize(&raw).unwrap();
        assert_eq!(msg.event, CanonicalEvent::CryingAlert);
        assert_eq!(msg.data.id, 7);
        let alert = msg.alert.unwrap();
        assert_eq!(alert.message, "Bé đang khóc");
        assert_eq!(alert.severity, Severity::Warning);
    }

    #[test]
    fn plain_health_update_has_no_alert() {
        let raw = format!(r#"{{"event": "HEALTH_UPDATE", "data": {}}}"#, data_json());
        let msg = normalize(&raw).unwrap();
        assert_eq!(msg.event, CanonicalEvent::HealthUpdate);
        assert!(msg.alert.is_none());
    }

    #[test]
    fn normalization_is_idempotent_on_canonical_input() {
        let raw = format!(
            r#"{{"event": "crying_alert", "data": {}, "alert": "x", "severity": "info"}}"#,
            data_json()
        );
        let first = normalize(&raw).unwrap();
        assert_eq!(first.event, CanonicalEvent::CryingAlert);

        // Re-normalizing the serialized canonical form yields the same record.
        let reserialized = format!(
            r#"{{"event": "{}", "data": {}, "alert": "x", "severity": "info"}}"#,
            first.event.as_str(),
            data_json()
        );
        let second = normalize(&reserialized).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_event_falls_back_to_lowercase() {
        let raw = format!(r#"{{"event": "TEMP_SPIKE", "data": {}}}"#, data_json());
        let msg = normalize(&raw).unwrap();
        assert_eq!(msg.event.as_str(), "temp_spike");
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = normalize("{not json").unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[test]
    fn missing_envelope_event_is_parse_error() {
        let err = normalize(r#"{"data": {}}"#).unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[test]
    fn payload_schema_mismatch_fails_closed() {
        // temperature missing
        let raw = r#"{"event": "HEALTH_UPDATE",
                      "data": {"id": 7, "humidity": 60.0, "cry_detected": false,
                               "sick_detected": false,
                               "created_at": "2026-08-07T10:00:00Z"}}"#;
        let err = normalize(raw).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema(_)));
    }

    #[test]
    fn alert_without_severity_fails_closed() {
        let raw = format!(
            r#"{{"event": "CRY_DETECTED", "data": {}, "alert": "Bé đang khóc"}}"#,
            data_json()
        );
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema(_)));
    }

    #[test]
    fn severity_without_alert_fails_closed() {
        let raw = format!(
            r#"{{"event": "CRY_DETECTED", "data": {}, "severity": "critical"}}"#,
            data_json()
        );
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, NormalizeError::Schema(_)));
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let raw = format!(
            r#"{{"event": "CRY_DETECTED", "data": {}, "alert": "x", "severity": "fatal"}}"#,
            data_json()
        );
        let err = normalize(&raw).unwrap_err();
        assert!(matches!(err, NormalizeError::Parse(_)));
    }

    #[test]
    fn notes_carried_through() {
        let raw = r#"{"event": "HEALTH_UPDATE",
                      "data": {"id": 7, "temperature": 36.8, "humidity": 60.0,
                               "cry_detected": false, "sick_detected": false,
                               "created_at": "2026-08-07T10:00:00Z",
                               "notes": "after feeding"}}"#;
        let msg = normalize(raw).unwrap();
        assert_eq!(msg.data.notes.as_deref(), Some("after feeding"));
    }
}
