//! Canonical test result records and the aggregated bulk mapping

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One normalized test outcome
///
/// This is the canonical shape consumers render: `ok` is always a real
/// boolean, `message` is always a string (empty when the backend sent
/// nothing usable), and `first_packet_ms` is either a finite number or
/// absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Did the probe pass
    pub ok: bool,

    /// Backend-provided detail, or a localized fallback on failure
    pub message: String,

    /// Milliseconds until the first response packet, when measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_packet_ms: Option<f64>,
}

impl TestResult {
    /// Create a passing result with no detail message
    pub fn passed() -> Self {
        Self {
            ok: true,
            message: String::new(),
            first_packet_ms: None,
        }
    }

    /// Create a failing result with a message
    pub fn failure<S: Into<String>>(message: S) -> Self {
        Self {
            ok: false,
            message: message.into(),
            first_packet_ms: None,
        }
    }

    /// Attach a first-packet latency measurement
    pub fn with_first_packet_ms(mut self, ms: f64) -> Self {
        self.first_packet_ms = Some(ms);
        self
    }

    /// Short status word for rendering
    pub fn status_label(&self) -> &'static str {
        if self.ok {
            "PASS"
        } else {
            "FAIL"
        }
    }
}

impl Default for TestResult {
    /// The all-absent record: not ok, no message, no latency
    fn default() -> Self {
        Self {
            ok: false,
            message: String::new(),
            first_packet_ms: None,
        }
    }
}

/// Results of a bulk run, keyed by configuration identifier
///
/// Insertion order follows the backend's response document, so rendering
/// matches what the panel would show. A synthetic `_global` row stands in
/// when a category produced zero per-configuration results but did report
/// a usable failure message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregatedResult {
    results: IndexMap<String, TestResult>,
}

impl AggregatedResult {
    /// Create an empty aggregation
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result for a configuration identifier
    pub fn insert<S: Into<String>>(&mut self, config_id: S, result: TestResult) {
        self.results.insert(config_id.into(), result);
    }

    /// Insert the synthetic category-wide failure row
    pub fn insert_global<S: Into<String>>(&mut self, message: S) {
        self.results.insert(
            crate::defaults::GLOBAL_RESULT_KEY.to_string(),
            TestResult::failure(message),
        );
    }

    /// Look up one configuration's result
    pub fn get(&self, config_id: &str) -> Option<&TestResult> {
        self.results.get(config_id)
    }

    /// Whether the synthetic `_global` row is present
    pub fn has_global(&self) -> bool {
        self.results.contains_key(crate::defaults::GLOBAL_RESULT_KEY)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate results in backend insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TestResult)> {
        self.results.iter()
    }

    /// Count of passing and failing rows
    pub fn summary(&self) -> (usize, usize) {
        let passed = self.results.values().filter(|r| r.ok).count();
        (passed, self.results.len() - passed)
    }

    /// True when at least one row exists and every row passed
    pub fn overall_ok(&self) -> bool {
        !self.results.is_empty() && self.results.values().all(|r| r.ok)
    }
}

impl<'a> IntoIterator for &'a AggregatedResult {
    type Item = (&'a String, &'a TestResult);
    type IntoIter = indexmap::map::Iter<'a, String, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl FromIterator<(String, TestResult)> for AggregatedResult {
    fn from_iter<I: IntoIterator<Item = (String, TestResult)>>(iter: I) -> Self {
        Self {
            results: iter.into_iter().collect(),
        }
    }
}
