//! Voice Config Tester - Main CLI Application
//!
//! Command-line driver for probing the admin panel's configuration test
//! endpoint and rendering normalized pass/fail results.

use clap::Parser;
use std::process;
use voice_config_tester::{
    app::{print_error_suggestions, App},
    cli::Cli,
    error::{ErrorReporter, Result},
};

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    // Parse command line arguments
    let cli = Cli::parse();
    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose);

    match run_application(cli).await {
        Ok(all_passed) => {
            // Semantic test failure is not an error, but scripts still
            // need to see it in the exit status.
            if !all_passed {
                process::exit(1);
            }
        }
        Err(e) => {
            reporter.report_error(&e);
            print_error_suggestions(&e);
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<bool> {
    let app = App::new(cli)?;
    app.run().await
}
