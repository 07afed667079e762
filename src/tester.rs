//! The three tester operations over the transport seam
//!
//! Each operation issues exactly one request, waits for it within its
//! timeout budget, and normalizes whatever comes back. Transport failures
//! pass through untouched; only well-formed-but-negative responses are
//! turned into failing results here.


use crate::{
    client::TestTransport,
    defaults,
    error::Result,
    logging::ProbeLogger,
    models::{AggregatedResult, TestRequest, TestResult},
    normalize::{category_map, normalize_entry, truthy, CategoryScan},
    types::ConfigKind,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Front door for configuration testing
///
/// Holds the transport seam, the two timeout budgets, and a probe logger.
/// One instance serves any number of calls; operations share no mutable
/// state.
pub struct ConfigTester {
    transport: Arc<dyn TestTransport>,
    single_timeout: Duration,
    bulk_timeout: Duration,
    logger: ProbeLogger,
}

impl ConfigTester {
    /// Create a tester with the default 30s/60s budgets
    pub fn new(transport: Arc<dyn TestTransport>) -> Self {
        Self {
            transport,
            single_timeout: defaults::SINGLE_TEST_TIMEOUT,
            bulk_timeout: defaults::BULK_TEST_TIMEOUT,
            logger: ProbeLogger::default(),
        }
    }

    /// Override the single/draft and bulk timeout budgets
    pub fn with_timeouts(mut self, single: Duration, bulk: Duration) -> Self {
        self.single_timeout = single;
        self.bulk_timeout = bulk;
        self
    }

    /// Attach a probe logger
    pub fn with_logger(mut self, logger: ProbeLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Build a tester from runtime configuration
    pub fn from_config(transport: Arc<dyn TestTransport>, config: &crate::models::TesterConfig) -> Self {
        Self::new(transport).with_timeouts(config.timeout(), config.bulk_timeout())
    }

    /// Test one configuration of a category
    ///
    /// With an identifier the backend is asked for exactly that
    /// configuration and its entry wins outright when present and truthy,
    /// even against a reserved-looking key. Without one (or with an empty
    /// one, which behaves as absent) the first entry in insertion order is
    /// returned, falling back to sentinel-derived failure messages when the
    /// category produced no entries at all.
    pub async fn test_single(
        &self,
        kind: ConfigKind,
        config_id: Option<&str>,
    ) -> Result<TestResult> {
        let config_id = config_id.filter(|id| !id.is_empty());
        let request = TestRequest::single(kind, config_id);
        let probe = self.logger.start(kind, "single", self.single_timeout);
        let body = self.run_probe(&probe, &request, self.single_timeout).await?;

        let map = match category_map(body, kind) {
            Some(map) => map,
            None => {
                self.logger.payload_missing(&probe);
                return Ok(TestResult::failure(defaults::MSG_NO_RESULT_RETURNED));
            }
        };

        if let Some(id) = config_id {
            if let Some(value) = map.get(id) {
                if truthy(value) {
                    return Ok(normalize_entry(value));
                }
            }
        }

        let scan = CategoryScan::from_map(&map);
        if scan.has_entries() {
            return Ok(scan.into_first_entry().unwrap_or_default());
        }

        let message = match scan.sentinels.select().and_then(|(_, s)| s.trimmed_message()) {
            Some(msg) => msg.to_string(),
            None if scan.sentinels.has_not_configured() => {
                defaults::MSG_NOT_CONFIGURED.to_string()
            }
            None => defaults::MSG_NO_TEST_RESULT.to_string(),
        };
        Ok(TestResult::failure(message))
    }

    /// Test every saved configuration of a category
    ///
    /// Returns one row per configuration in the backend's insertion order.
    /// A malformed payload yields an empty mapping; a category that
    /// produced zero rows but a usable sentinel message yields the single
    /// synthetic `_global` row so callers always have something to render.
    pub async fn test_all(&self, kind: ConfigKind) -> Result<AggregatedResult> {
        let request = TestRequest::bulk(kind);
        let probe = self.logger.start(kind, "bulk", self.bulk_timeout);
        let body = self.run_probe(&probe, &request, self.bulk_timeout).await?;

        let mut out = AggregatedResult::new();
        let map = match category_map(body, kind) {
            Some(map) => map,
            None => {
                self.logger.payload_missing(&probe);
                return Ok(out);
            }
        };

        let scan = CategoryScan::from_map(&map);

        // An object sentinel contributes its trimmed message even when that
        // trims to nothing, which then suppresses the fallback row; only
        // markers and absent sentinels get the fixed default.
        let fallback = match scan.sentinels.select() {
            Some((_, signal)) if signal.is_report() => {
                signal.trimmed_message().unwrap_or("").to_string()
            }
            _ => defaults::MSG_NO_RESULT_RETURNED.to_string(),
        };

        for (config_id, result) in scan.entries {
            out.insert(config_id, result);
        }

        if out.is_empty() && !fallback.is_empty() {
            out.insert_global(fallback);
        }

        Ok(out)
    }

    /// Test an unsaved payload mapping without persisting it
    ///
    /// `_error` and `_no_client` block the whole category here and their
    /// message is propagated verbatim, before entries are even considered.
    /// `_none` is not blocking; it only colors the empty-result message.
    /// A single result is returned in every case.
    pub async fn test_draft(
        &self,
        kind: ConfigKind,
        type_data: Map<String, Value>,
    ) -> Result<TestResult> {
        let request = TestRequest::draft(kind, type_data);
        let probe = self.logger.start(kind, "draft", self.single_timeout);
        let body = self.run_probe(&probe, &request, self.single_timeout).await?;

        let map = match category_map(body, kind) {
            Some(map) => map,
            None => {
                self.logger.payload_missing(&probe);
                return Ok(TestResult::failure(defaults::MSG_NO_RESULT_RETURNED));
            }
        };

        let scan = CategoryScan::from_map(&map);

        if let Some(message) = scan
            .sentinels
            .select_blocking()
            .and_then(|(_, s)| s.verbatim_message())
        {
            return Ok(TestResult::failure(message));
        }

        if scan.has_entries() {
            return Ok(scan.into_first_entry().unwrap_or_default());
        }

        let message = scan
            .sentinels
            .not_configured()
            .and_then(|s| s.verbatim_message())
            .unwrap_or(defaults::MSG_NO_TEST_RESULT);
        Ok(TestResult::failure(message.to_string()))
    }

    async fn run_probe(
        &self,
        probe: &crate::logging::ProbeContext,
        request: &TestRequest,
        timeout: Duration,
    ) -> Result<Value> {
        let started = Instant::now();
        match self.transport.post_test(request, timeout).await {
            Ok(body) => {
                self.logger.completed(probe, started.elapsed());
                Ok(body)
            }
            Err(error) => {
                self.logger.failed(probe, started.elapsed(), &error);
                Err(error)
            }
        }
    }
}
