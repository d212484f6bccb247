use std::collections::HashMap;

use crate::core::rename::RenameError;

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Where the Drive service-account credential comes from.
#[derive(Debug, Clone)]
pub enum ServiceAccountSource {
    /// The JSON key content itself (deployment secrets).
    Json(String),
    /// Path to the JSON key file on disk.
    KeyFile(String),
}

/// All runtime configuration, gathered once at startup. Business logic never
/// reads the environment; it gets this struct (or pieces of it) injected.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub service_account: ServiceAccountSource,
    pub drive_folder_id: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, RenameError> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Pure constructor so tests can pass literal maps instead of mutating
    /// the process environment.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, RenameError> {
        let gemini_api_key = require(vars, "GEMINI_API_KEY")?;
        let drive_folder_id = require(vars, "DRIVE_FOLDER_ID")?;

        let service_account = if let Some(path) = non_empty(vars, "DRIVE_SERVICE_ACCOUNT_KEY") {
            ServiceAccountSource::KeyFile(path)
        } else if let Some(json) = non_empty(vars, "DRIVE_SERVICE_ACCOUNT") {
            ServiceAccountSource::Json(json)
        } else {
            return Err(RenameError::Configuration(
                "neither DRIVE_SERVICE_ACCOUNT nor DRIVE_SERVICE_ACCOUNT_KEY is set".to_string(),
            ));
        };

        let gemini_model = non_empty(vars, "GEMINI_MODEL")
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            gemini_api_key,
            gemini_model,
            service_account,
            drive_folder_id,
        })
    }
}

fn non_empty(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name).filter(|v| !v.is_empty()).cloned()
}

fn require(vars: &HashMap<String, String>, name: &str) -> Result<String, RenameError> {
    non_empty(vars, name)
        .ok_or_else(|| RenameError::Configuration(format!("missing {name} environment variable")))
}
