//! Main application orchestration and execution

use crate::{
    cli::Cli,
    client::EndpointClient,
    config::{display_config_summary, load_config},
    error::{AppError, Result},
    logging::{LoggerFactory, ProbeLogger},
    normalize::coerce_payload,
    output::ResultRenderer,
    tester::ConfigTester,
    types::ConfigKind,
};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// Main application struct that coordinates all components
#[derive(Debug)]
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        cli.validate().map_err(AppError::validation)?;
        Ok(Self { cli })
    }

    /// Run the selected test mode
    ///
    /// `Ok(true)` means every produced result passed; `Ok(false)` is a
    /// semantic test failure the binary maps to exit code 1. Transport and
    /// configuration problems surface as `Err`.
    pub async fn run(self) -> Result<bool> {
        let config = load_config(self.cli.clone())?;

        if config.debug {
            eprintln!("{} v{}", crate::PKG_NAME, crate::VERSION);
            match option_env!("GIT_COMMIT") {
                Some(commit) => eprintln!("Build: {} ({})", env!("BUILD_TIME"), commit),
                None => eprintln!("Build: {}", env!("BUILD_TIME")),
            }
            display_config_summary(&config);
        }

        let factory = LoggerFactory::new(config.clone());
        let logger = factory.create_logger("APP");
        let probe_logger = factory.create_probe_logger();

        logger
            .debug("Session started")
            .field("base_url", &config.base_url)
            .field("mode", self.cli.to_mode().name())
            .log();

        let client = EndpointClient::from_config(&config)?;
        let tester = ConfigTester::from_config(Arc::new(client), &config)
            .with_logger(probe_logger.clone());

        let renderer = ResultRenderer::from_config(&config);
        let kind = self.cli.category;

        // Dispatch order mirrors Cli::to_mode: draft wins over --all,
        // --all wins over single.
        if let Some(path) = self.cli.draft.clone() {
            self.run_draft(&tester, &renderer, &probe_logger, kind, &path)
                .await
        } else if self.cli.all {
            self.run_all(&tester, &renderer, kind).await
        } else {
            self.run_single(&tester, &renderer, kind).await
        }
    }

    /// Test one configuration, or the category's first available one
    async fn run_single(
        &self,
        tester: &ConfigTester,
        renderer: &ResultRenderer,
        kind: ConfigKind,
    ) -> Result<bool> {
        let config_id = self.cli.config_id.as_deref();
        let result = tester.test_single(kind, config_id).await?;

        println!("{}", renderer.render_single(kind, config_id, &result)?);

        Ok(result.ok)
    }

    /// Test every configuration of the category
    async fn run_all(
        &self,
        tester: &ConfigTester,
        renderer: &ResultRenderer,
        kind: ConfigKind,
    ) -> Result<bool> {
        let results = tester.test_all(kind).await?;

        println!("{}", renderer.render_aggregated(kind, &results)?);

        Ok(results.overall_ok())
    }

    /// Test an unsaved draft payload loaded from a file
    async fn run_draft(
        &self,
        tester: &ConfigTester,
        renderer: &ResultRenderer,
        probe_logger: &ProbeLogger,
        kind: ConfigKind,
        path: &Path,
    ) -> Result<bool> {
        let payload = Self::load_draft_payload(path, probe_logger)?;
        let result = tester.test_draft(kind, payload).await?;

        println!("{}", renderer.render_single(kind, None, &result)?);

        Ok(result.ok)
    }

    /// Read and coerce a draft file into the id-to-payload mapping
    ///
    /// The file may hold the mapping as a JSON object or as a serialized
    /// JSON string of one. Anything else coerces to an empty mapping, which
    /// is logged but still sent so the backend answers authoritatively.
    fn load_draft_payload(
        path: &Path,
        probe_logger: &ProbeLogger,
    ) -> Result<serde_json::Map<String, Value>> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AppError::io(format!(
                "Failed to read draft file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let input_len = text.trim().len();
        let value = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
        let payload = coerce_payload(value);

        if payload.is_empty() && input_len > 0 {
            probe_logger.payload_discarded(&format!("{} bytes of unusable input", input_len));
        }

        Ok(payload)
    }
}

/// Print helpful suggestions for common errors
pub fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) | AppError::Validation(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format");
            eprintln!("  - Base URL must start with http:// or https://");
            eprintln!("  - Timeouts must be between 1 and 300 seconds");
        }
        AppError::Network(_) => {
            eprintln!();
            eprintln!("Network troubleshooting:");
            eprintln!("  - Check that the management backend is running");
            eprintln!("  - Verify the base URL host and port");
            eprintln!("  - Check firewall settings");
        }
        AppError::Timeout(_) => {
            eprintln!();
            eprintln!("Timeout troubleshooting:");
            eprintln!("  - Increase the budget with --timeout");
            eprintln!("  - Slow model providers often need 60s or more");
        }
        AppError::Auth(_) => {
            eprintln!();
            eprintln!("Authentication help:");
            eprintln!("  - Supply a valid token with --token or CONFIG_TEST_TOKEN");
            eprintln!("  - Tokens expire; fetch a fresh one from the panel");
        }
        AppError::Io(_) => {
            eprintln!();
            eprintln!("File help:");
            eprintln!("  - Check that the draft file exists and is readable");
        }
        _ => {}
    }
}
