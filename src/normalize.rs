//! Response normalization for the configuration test endpoint
//!
//! The backend is loose about shape: the payload may sit under a `data`
//! field or arrive bare, a category may map identifiers to result objects
//! or carry underscore-prefixed sentinel markers, and numeric fields may
//! come back as strings. Everything here turns that into the canonical
//! [`TestResult`] shape before any caller sees it.

use crate::models::TestResult;
use crate::types::ConfigKind;
use serde::Deserialize;
use serde_json::{Map, Value};

/// JavaScript-style truthiness for JSON values
///
/// The backend's sentinel contract and the `ok` field predate typed
/// clients, so presence checks and boolean coercion follow the loose
/// rules: null, false, zero, and the empty string are falsy; every
/// array and object is truthy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse a `first_packet_ms` field with explicit fallback
///
/// An already-numeric value passes through unchanged and is never
/// re-parsed. A string gets one trimmed `f64` parse; anything
/// non-finite or unparseable is treated as absent, as is every other
/// JSON type.
pub fn parse_first_packet_ms(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|ms| ms.is_finite()),
        _ => None,
    }
}

/// Normalize one raw result entry into the canonical record
///
/// Non-objects collapse to the all-absent record. `ok` is coerced with
/// [`truthy`], `message` is kept only when it is a non-empty string, and
/// the latency field goes through [`parse_first_packet_ms`].
pub fn normalize_entry(value: &Value) -> TestResult {
    let map = match value.as_object() {
        Some(map) => map,
        None => return TestResult::default(),
    };

    let ok = map.get("ok").map(truthy).unwrap_or(false);
    let message = map
        .get("message")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_default();
    let first_packet_ms = map.get("first_packet_ms").and_then(parse_first_packet_ms);

    TestResult {
        ok,
        message,
        first_packet_ms,
    }
}

/// Coerce a form's serialized-JSON value into a plain mapping
///
/// Objects move through untouched. A string gets one JSON parse and
/// survives only when it parses to an object. Everything else, including
/// parse failures, yields an empty mapping; the caller cannot act on a
/// parse error at this layer, so none is surfaced.
pub fn coerce_payload(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

/// The two response envelope shapes the endpoint produces
///
/// Newer backends wrap the payload as `{"data": {...}}`; older ones
/// return it bare. The nested form is tried first, so a bare payload
/// that happens to contain an object-valued `data` key unwraps the same
/// way the panel's own client would.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    /// Payload nested under a `data` field
    Nested { data: Map<String, Value> },
    /// Bare payload object
    Flat(Map<String, Value>),
}

impl ResponseEnvelope {
    /// Parse a response body; anything that is not an object in either
    /// shape has no payload
    pub fn parse(body: Value) -> Option<Self> {
        serde_json::from_value(body).ok()
    }

    /// Unwrap to the payload map
    pub fn into_payload(self) -> Map<String, Value> {
        match self {
            ResponseEnvelope::Nested { data } => data,
            ResponseEnvelope::Flat(map) => map,
        }
    }
}

/// Extract one category's result map from a response body
///
/// Returns `None` when the body has no payload, the category key is
/// missing, or its value is not object-shaped; callers map that onto
/// their no-result outcome.
pub fn category_map(body: Value, kind: ConfigKind) -> Option<Map<String, Value>> {
    let envelope = ResponseEnvelope::parse(body)?;
    match envelope.into_payload().remove(kind.as_str()) {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// The three reserved sentinel markers a category map can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelKind {
    /// `_error`: the probe itself failed
    Error,
    /// `_no_client`: no client for the category could be constructed
    NoClient,
    /// `_none`: nothing is configured or enabled for the category
    NotConfigured,
}

impl SentinelKind {
    /// The reserved key for this sentinel
    pub const fn key(&self) -> &'static str {
        match self {
            SentinelKind::Error => "_error",
            SentinelKind::NoClient => "_no_client",
            SentinelKind::NotConfigured => "_none",
        }
    }

    /// Match a map key against the reserved sentinel names
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "_error" => Some(SentinelKind::Error),
            "_no_client" => Some(SentinelKind::NoClient),
            "_none" => Some(SentinelKind::NotConfigured),
            _ => None,
        }
    }
}

/// A sentinel's recorded value, tagged by shape
///
/// Only truthy sentinel values are recorded at all. Object-shaped ones
/// may carry a usable message; any other truthy value marks the
/// condition without one, which matters because markers fall back to
/// fixed messages while an object with a blank message can suppress the
/// bulk fallback row entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum SentinelSignal {
    /// Truthy but not an object; never carries a message
    Marker,
    /// Object-shaped report, message kept verbatim when it is a string
    Report { message: Option<String> },
}

impl SentinelSignal {
    fn from_value(value: &Value) -> Option<Self> {
        if !truthy(value) {
            return None;
        }
        match value {
            Value::Object(map) => Some(SentinelSignal::Report {
                message: map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            _ => Some(SentinelSignal::Marker),
        }
    }

    /// Whether this signal is an object-shaped report
    pub fn is_report(&self) -> bool {
        matches!(self, SentinelSignal::Report { .. })
    }

    /// Trimmed message, only when something non-empty survives the trim
    pub fn trimmed_message(&self) -> Option<&str> {
        match self {
            SentinelSignal::Report { message: Some(m) } => {
                let trimmed = m.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }

    /// Verbatim message, only when non-empty (whitespace counts)
    pub fn verbatim_message(&self) -> Option<&str> {
        match self {
            SentinelSignal::Report { message: Some(m) } if !m.is_empty() => Some(m),
            _ => None,
        }
    }
}

/// Sentinel signals found in one category map
///
/// All three slots are kept independently because the fallback message
/// choice can consult `_none` even when a higher-priority sentinel was
/// selected for the message itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentinelSet {
    error: Option<SentinelSignal>,
    no_client: Option<SentinelSignal>,
    none: Option<SentinelSignal>,
}

impl SentinelSet {
    fn record(&mut self, kind: SentinelKind, value: &Value) {
        let signal = SentinelSignal::from_value(value);
        match kind {
            SentinelKind::Error => self.error = signal,
            SentinelKind::NoClient => self.no_client = signal,
            SentinelKind::NotConfigured => self.none = signal,
        }
    }

    /// Select the active sentinel in priority order
    /// `_error` > `_no_client` > `_none`
    pub fn select(&self) -> Option<(SentinelKind, &SentinelSignal)> {
        if let Some(signal) = &self.error {
            Some((SentinelKind::Error, signal))
        } else if let Some(signal) = &self.no_client {
            Some((SentinelKind::NoClient, signal))
        } else {
            self.none
                .as_ref()
                .map(|signal| (SentinelKind::NotConfigured, signal))
        }
    }

    /// Select only the category-blocking sentinels, `_error` > `_no_client`
    ///
    /// Draft testing consults these before looking at entries and never
    /// treats `_none` as blocking.
    pub fn select_blocking(&self) -> Option<(SentinelKind, &SentinelSignal)> {
        if let Some(signal) = &self.error {
            Some((SentinelKind::Error, signal))
        } else {
            self.no_client
                .as_ref()
                .map(|signal| (SentinelKind::NoClient, signal))
        }
    }

    /// The `_none` signal, independent of priority selection
    pub fn not_configured(&self) -> Option<&SentinelSignal> {
        self.none.as_ref()
    }

    /// Whether a truthy `_none` was present
    pub fn has_not_configured(&self) -> bool {
        self.none.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.no_client.is_none() && self.none.is_none()
    }
}

/// One pass over a category map, splitting real entries from sentinels
///
/// Entries keep the map's insertion order and are normalized eagerly.
/// The reserved sentinel keys feed the [`SentinelSet`]; any other
/// underscore-prefixed key belongs to the reserved namespace and is
/// dropped entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScan {
    /// Non-sentinel results in insertion order, already normalized
    pub entries: Vec<(String, TestResult)>,
    /// Sentinel signals found alongside them
    pub sentinels: SentinelSet,
}

impl CategoryScan {
    /// Scan a category's raw result map
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let mut scan = CategoryScan::default();
        for (key, value) in map {
            if let Some(kind) = SentinelKind::from_key(key) {
                scan.sentinels.record(kind, value);
            } else if key.starts_with('_') {
                continue;
            } else {
                scan.entries.push((key.clone(), normalize_entry(value)));
            }
        }
        scan
    }

    /// First entry in insertion order, consuming the scan
    pub fn into_first_entry(self) -> Option<TestResult> {
        self.entries.into_iter().next().map(|(_, result)| result)
    }

    pub fn has_entries(&self) -> bool {
        !self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_truthy_matches_loose_rules() {
        assert!(!truthy(&Value::Null));
        assert!(!truthy(&json!(false)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!(0.0)));
        assert!(!truthy(&json!(-0.0)));
        assert!(!truthy(&json!("")));

        assert!(truthy(&json!(true)));
        assert!(truthy(&json!(1)));
        assert!(truthy(&json!(-3.5)));
        assert!(truthy(&json!("0")));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
    }

    #[test]
    fn test_ms_numeric_pass_through() {
        assert_eq!(parse_first_packet_ms(&json!(150)), Some(150.0));
        assert_eq!(parse_first_packet_ms(&json!(12.75)), Some(12.75));
        assert_eq!(parse_first_packet_ms(&json!(0)), Some(0.0));
    }

    #[test]
    fn test_ms_string_parse_with_fallback() {
        assert_eq!(parse_first_packet_ms(&json!("120")), Some(120.0));
        assert_eq!(parse_first_packet_ms(&json!("  88.5 ")), Some(88.5));
        assert_eq!(parse_first_packet_ms(&json!("fast")), None);
        assert_eq!(parse_first_packet_ms(&json!("")), None);
        assert_eq!(parse_first_packet_ms(&json!("NaN")), None);
        assert_eq!(parse_first_packet_ms(&json!("inf")), None);
    }

    #[test]
    fn test_ms_other_types_absent() {
        assert_eq!(parse_first_packet_ms(&Value::Null), None);
        assert_eq!(parse_first_packet_ms(&json!(true)), None);
        assert_eq!(parse_first_packet_ms(&json!([120])), None);
        assert_eq!(parse_first_packet_ms(&json!({"value": 120})), None);
    }

    #[test]
    fn test_normalize_non_object_collapses() {
        for value in [
            Value::Null,
            json!(7),
            json!("ok"),
            json!(true),
            json!([{"ok": true}]),
        ] {
            assert_eq!(normalize_entry(&value), TestResult::default());
        }
    }

    #[test]
    fn test_normalize_coerces_ok_field() {
        assert!(normalize_entry(&json!({"ok": true})).ok);
        assert!(normalize_entry(&json!({"ok": 1})).ok);
        assert!(normalize_entry(&json!({"ok": "yes"})).ok);
        assert!(normalize_entry(&json!({"ok": {}})).ok);

        assert!(!normalize_entry(&json!({"ok": false})).ok);
        assert!(!normalize_entry(&json!({"ok": 0})).ok);
        assert!(!normalize_entry(&json!({"ok": ""})).ok);
        assert!(!normalize_entry(&json!({"ok": null})).ok);
        assert!(!normalize_entry(&json!({"message": "hi"})).ok);
    }

    #[test]
    fn test_normalize_message_string_only() {
        assert_eq!(
            normalize_entry(&json!({"message": "连接超时"})).message,
            "连接超时"
        );
        assert_eq!(normalize_entry(&json!({"message": ""})).message, "");
        assert_eq!(normalize_entry(&json!({"message": 5})).message, "");
        assert_eq!(normalize_entry(&json!({"message": null})).message, "");
        assert_eq!(normalize_entry(&json!({})).message, "");
    }

    #[test]
    fn test_normalize_full_record() {
        let result = normalize_entry(&json!({
            "ok": true,
            "message": "正常",
            "first_packet_ms": "120",
            "extra": "ignored"
        }));
        assert_eq!(
            result,
            TestResult {
                ok: true,
                message: "正常".to_string(),
                first_packet_ms: Some(120.0),
            }
        );
    }

    #[test]
    fn test_coerce_object_identity() {
        let mut map = Map::new();
        map.insert("a".to_string(), json!(1));
        assert_eq!(coerce_payload(Value::Object(map.clone())), map);
    }

    #[test]
    fn test_coerce_string_parses_objects_only() {
        let coerced = coerce_payload(json!(r#"{"a": 1}"#));
        assert_eq!(coerced.get("a"), Some(&json!(1)));

        assert!(coerce_payload(json!("not json")).is_empty());
        assert!(coerce_payload(json!("[1, 2]")).is_empty());
        assert!(coerce_payload(json!("null")).is_empty());
        assert!(coerce_payload(json!("42")).is_empty());
    }

    #[test]
    fn test_coerce_other_types_empty() {
        assert!(coerce_payload(Value::Null).is_empty());
        assert!(coerce_payload(json!(3)).is_empty());
        assert!(coerce_payload(json!(true)).is_empty());
        assert!(coerce_payload(json!([{"a": 1}])).is_empty());
    }

    #[test]
    fn test_envelope_nested_preferred() {
        let body = json!({"data": {"llm": {"cfg": {"ok": true}}}});
        let map = category_map(body, ConfigKind::Llm).unwrap();
        assert!(map.contains_key("cfg"));
    }

    #[test]
    fn test_envelope_bare_payload_accepted() {
        let body = json!({"llm": {"cfg": {"ok": true}}});
        let map = category_map(body, ConfigKind::Llm).unwrap();
        assert!(map.contains_key("cfg"));
    }

    #[test]
    fn test_envelope_non_object_data_falls_back_to_bare() {
        // A bare payload may itself carry a non-object "data" key; only
        // an object-valued one means nesting.
        let body = json!({"data": "v2", "llm": {"cfg": {"ok": true}}});
        let map = category_map(body, ConfigKind::Llm).unwrap();
        assert!(map.contains_key("cfg"));
    }

    #[test]
    fn test_envelope_rejects_non_objects() {
        assert_eq!(category_map(json!("plain text"), ConfigKind::Llm), None);
        assert_eq!(category_map(json!(42), ConfigKind::Llm), None);
        assert_eq!(category_map(json!([1, 2]), ConfigKind::Llm), None);
        assert_eq!(category_map(Value::Null, ConfigKind::Llm), None);
    }

    #[test]
    fn test_category_must_be_object_shaped() {
        assert_eq!(category_map(json!({"llm": null}), ConfigKind::Llm), None);
        assert_eq!(category_map(json!({"llm": "bad"}), ConfigKind::Llm), None);
        assert_eq!(category_map(json!({"llm": [1]}), ConfigKind::Llm), None);
        assert_eq!(category_map(json!({"vad": {}}), ConfigKind::Llm), None);
    }

    #[test]
    fn test_sentinel_kind_keys() {
        assert_eq!(SentinelKind::from_key("_error"), Some(SentinelKind::Error));
        assert_eq!(
            SentinelKind::from_key("_no_client"),
            Some(SentinelKind::NoClient)
        );
        assert_eq!(
            SentinelKind::from_key("_none"),
            Some(SentinelKind::NotConfigured)
        );
        assert_eq!(SentinelKind::from_key("_other"), None);
        assert_eq!(SentinelKind::from_key("cfg1"), None);
        assert_eq!(SentinelKind::Error.key(), "_error");
    }

    #[test]
    fn test_scan_splits_entries_and_sentinels() {
        let map = json!({
            "cfg-b": {"ok": true},
            "_error": {"message": "boom"},
            "cfg-a": {"ok": false, "message": "bad"},
            "_hint": {"message": "ignored"}
        });
        let scan = CategoryScan::from_map(map.as_object().unwrap());

        let keys: Vec<&str> = scan.entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["cfg-b", "cfg-a"]);
        assert_eq!(
            scan.sentinels.select().unwrap().0,
            SentinelKind::Error
        );
    }

    #[test]
    fn test_scan_ignores_falsy_sentinels() {
        let map = json!({"_error": null, "_no_client": 0, "_none": ""});
        let scan = CategoryScan::from_map(map.as_object().unwrap());
        assert!(scan.sentinels.is_empty());
        assert!(!scan.sentinels.has_not_configured());
    }

    #[test]
    fn test_scan_entries_keep_falsy_values() {
        // A falsy value under a real identifier is still an entry; it
        // normalizes to the all-absent record.
        let map = json!({"cfg": null});
        let scan = CategoryScan::from_map(map.as_object().unwrap());
        assert_eq!(scan.entries.len(), 1);
        assert_eq!(scan.entries[0].1, TestResult::default());
    }

    #[test]
    fn test_sentinel_priority_order() {
        let map = json!({
            "_none": {"message": "nothing"},
            "_no_client": {"message": "down"},
            "_error": {"message": "boom"}
        });
        let scan = CategoryScan::from_map(map.as_object().unwrap());
        let (kind, signal) = scan.sentinels.select().unwrap();
        assert_eq!(kind, SentinelKind::Error);
        assert_eq!(signal.trimmed_message(), Some("boom"));
    }

    #[test]
    fn test_sentinel_priority_skips_absent_slots() {
        let map = json!({"_none": {"message": "nothing"}, "_no_client": {"message": "down"}});
        let scan = CategoryScan::from_map(map.as_object().unwrap());
        assert_eq!(scan.sentinels.select().unwrap().0, SentinelKind::NoClient);
    }

    #[test]
    fn test_marker_selected_over_lower_priority_report() {
        // A truthy non-object `_error` wins selection even though it has
        // no message; lower-priority sentinels never get consulted.
        let map = json!({"_error": "boom", "_no_client": {"message": "down"}});
        let scan = CategoryScan::from_map(map.as_object().unwrap());
        let (kind, signal) = scan.sentinels.select().unwrap();
        assert_eq!(kind, SentinelKind::Error);
        assert_eq!(*signal, SentinelSignal::Marker);
        assert_eq!(signal.trimmed_message(), None);
    }

    #[test]
    fn test_blocking_selection_excludes_none() {
        let map = json!({"_none": {"message": "nothing"}});
        let scan = CategoryScan::from_map(map.as_object().unwrap());
        assert!(scan.sentinels.select_blocking().is_none());
        assert!(scan.sentinels.has_not_configured());
    }

    #[test]
    fn test_signal_message_helpers() {
        let report = SentinelSignal::Report {
            message: Some("  padded  ".to_string()),
        };
        assert_eq!(report.trimmed_message(), Some("padded"));
        assert_eq!(report.verbatim_message(), Some("  padded  "));

        let blank = SentinelSignal::Report {
            message: Some("   ".to_string()),
        };
        assert_eq!(blank.trimmed_message(), None);
        assert_eq!(blank.verbatim_message(), Some("   "));

        let empty = SentinelSignal::Report {
            message: Some(String::new()),
        };
        assert_eq!(empty.trimmed_message(), None);
        assert_eq!(empty.verbatim_message(), None);

        let non_string = SentinelSignal::Report { message: None };
        assert_eq!(non_string.trimmed_message(), None);
        assert_eq!(non_string.verbatim_message(), None);

        assert_eq!(SentinelSignal::Marker.trimmed_message(), None);
        assert_eq!(SentinelSignal::Marker.verbatim_message(), None);
    }

    #[test]
    fn test_into_first_entry_insertion_order() {
        let map = json!({
            "zzz": {"ok": true, "first_packet_ms": 9},
            "aaa": {"ok": false}
        });
        let scan = CategoryScan::from_map(map.as_object().unwrap());
        let first = scan.into_first_entry().unwrap();
        assert!(first.ok);
        assert_eq!(first.first_packet_ms, Some(9.0));
    }

    mod generators {
        use super::*;

        /// Generate leaf JSON values that are not objects
        pub fn non_object_values() -> impl Strategy<Value = Value> {
            prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                "[a-zA-Z0-9]{0,12}".prop_map(Value::from),
                proptest::collection::vec(any::<i32>().prop_map(Value::from), 0..4)
                    .prop_map(Value::Array),
            ]
        }

        /// Generate arbitrary result-like objects
        pub fn result_objects() -> impl Strategy<Value = Value> {
            (
                proptest::option::of(non_object_values()),
                proptest::option::of("[a-z\u{4e00}-\u{9fff}]{0,10}"),
                proptest::option::of(prop_oneof![
                    any::<u32>().prop_map(Value::from),
                    "[0-9]{1,4}".prop_map(Value::from),
                    Just(Value::Null),
                ]),
            )
                .prop_map(|(ok, message, ms)| {
                    let mut map = Map::new();
                    if let Some(ok) = ok {
                        map.insert("ok".to_string(), ok);
                    }
                    if let Some(message) = message {
                        map.insert("message".to_string(), Value::from(message));
                    }
                    if let Some(ms) = ms {
                        map.insert("first_packet_ms".to_string(), ms);
                    }
                    Value::Object(map)
                })
        }
    }

    mod property_tests {
        use super::*;

        proptest! {
            /// Non-objects always collapse to the all-absent record
            #[test]
            fn non_objects_collapse(value in generators::non_object_values()) {
                prop_assert_eq!(normalize_entry(&value), TestResult::default());
            }

            /// The ok field coerces exactly like the loose rules say
            #[test]
            fn ok_matches_truthiness(value in generators::result_objects()) {
                let result = normalize_entry(&value);
                let expected = value
                    .get("ok")
                    .map(truthy)
                    .unwrap_or(false);
                prop_assert_eq!(result.ok, expected);
            }

            /// Latency is always finite or absent, whatever arrives
            #[test]
            fn latency_finite_or_absent(value in generators::result_objects()) {
                if let Some(ms) = normalize_entry(&value).first_packet_ms {
                    prop_assert!(ms.is_finite());
                }
            }

            /// Numeric latency passes through exactly
            #[test]
            fn numeric_latency_unchanged(ms in proptest::num::f64::NORMAL) {
                let value = serde_json::json!({"first_packet_ms": ms});
                // json! lowers the f64 through serde_json::Number and back
                let expected = value.get("first_packet_ms").unwrap().as_f64();
                prop_assert_eq!(normalize_entry(&value).first_packet_ms, expected);
            }

            /// Object coercion is the identity
            #[test]
            fn coerce_object_is_identity(
                keys in proptest::collection::vec("[a-z]{1,8}", 0..5)
            ) {
                let mut map = Map::new();
                for (i, key) in keys.into_iter().enumerate() {
                    map.insert(key, Value::from(i as u64));
                }
                prop_assert_eq!(coerce_payload(Value::Object(map.clone())), map);
            }

            /// String coercion never panics and yields a map
            #[test]
            fn coerce_string_total(text in ".{0,64}") {
                let _ = coerce_payload(Value::from(text));
            }
        }
    }
}
