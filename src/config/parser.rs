//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::Result,
    models::TesterConfig,
    types::TestMode,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<TesterConfig> {
        // Start with default configuration
        let mut config = TesterConfig::default();

        // Load from environment file if it exists
        self.load_env_file()?;

        // Merge environment variables into config
        config.merge_from_env()?;

        // Override with CLI arguments
        self.apply_cli_overrides(&mut config);

        // Validate the final configuration
        config.validate()?;

        Ok(config)
    }

    /// Load environment variables from a .env file
    fn load_env_file(&self) -> Result<()> {
        match &self.cli.env_file {
            Some(path) => EnvManager::load_env_file_from(path, self.cli.debug),
            None => EnvManager::load_env_file(self.cli.debug),
        }
    }

    /// Apply CLI argument overrides to the configuration
    fn apply_cli_overrides(&self, config: &mut TesterConfig) {
        if let Some(base_url) = &self.cli.base_url {
            config.base_url = base_url.clone();
        }

        if let Some(token) = &self.cli.token {
            config.auth_token = Some(token.clone());
        }

        // --timeout overrides the budget for the selected mode only
        if let Some(timeout) = self.cli.timeout {
            match self.cli.to_mode() {
                TestMode::Bulk => config.bulk_timeout_seconds = timeout,
                TestMode::Single { .. } | TestMode::Draft { .. } => {
                    config.timeout_seconds = timeout;
                }
            }
        }

        if self.cli.color {
            config.enable_color = true;
        } else if self.cli.no_color || !self.cli.use_colors() {
            config.enable_color = false;
        }

        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;
        config.json_output = self.cli.json;
    }
}

/// Convenience function to parse configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<TesterConfig> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &TesterConfig) {
    eprintln!("Configuration Summary:");
    eprintln!("  Base URL: {}", config.base_url);
    eprintln!(
        "  Token: {}",
        match &config.auth_token {
            Some(_) => "***set***",
            None => "none",
        }
    );
    eprintln!("  Single/draft timeout: {}s", config.timeout_seconds);
    eprintln!("  Bulk timeout: {}s", config.bulk_timeout_seconds);
    eprintln!("  Colored output: {}", config.enable_color);
    eprintln!("  Verbose: {}", config.verbose);
    eprintln!("  JSON output: {}", config.json_output);
    eprintln!();
}
