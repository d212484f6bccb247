// This is the entry point of the exhibit renamer.
//
// **Architecture Overview:**
// - `core/` = Business logic (vendor-agnostic): parse, synthesizer, driver
// - `infra/` = Implementations of core traits (Gemini, Drive)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize clients (dependency injection)
// 3. Run the batch driver and print the summary

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with a pair of mod.rs files that look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

mod config;

use std::process::ExitCode;

use crate::config::{AppConfig, ServiceAccountSource};
use crate::core::rename::{BatchDriver, FilenameSynthesizer};
use crate::infra::ai::GeminiClient;
use crate::infra::drive::{DriveClient, ServiceAccountAuth};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Configuration problems are the only errors that abort before any item
    // is touched.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let auth = match &config.service_account {
        ServiceAccountSource::KeyFile(path) => ServiceAccountAuth::from_file(path).await,
        ServiceAccountSource::Json(json) => ServiceAccountAuth::from_json(json),
    };
    let auth = match auth {
        Ok(auth) => auth,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Wire the concrete clients into the core pipeline.

    let storage = DriveClient::new(auth);
    let analysis = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let synthesizer = FilenameSynthesizer::new(analysis);
    let driver = BatchDriver::new(synthesizer, storage);

    tracing::info!(
        "Starting batch run against folder {} using model {}",
        config.drive_folder_id,
        config.gemini_model
    );

    match driver.run(&config.drive_folder_id).await {
        Ok(summary) => {
            println!("Done: {summary}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Batch run failed: {err}");
            ExitCode::FAILURE
        }
    }
}
