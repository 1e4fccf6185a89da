//! Panel configuration: message-catalog keys, error styling classes, and the
//! service-type tags the panel watches.
//!
//! Every section is optional in TOML; missing keys fall back to the
//! defaults below.

use crate::error::ConfigError;
use crate::record::RECOGNIZED_TAGS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const STATUS_PROGRESS_KEY: &str =
    "umlaut.services.borrow_direct_adaptor.bd_request_status.progress";
pub const PROMPT_PROGRESS_KEY: &str =
    "umlaut.services.borrow_direct_adaptor.bd_request_prompt.progress";
pub const SUBMISSION_ERROR_KEY: &str =
    "umlaut.services.borrow_direct_adaptor.bd_request_status.error";
pub const SECTION_ERROR_KEY: &str = "umlaut.display_sections.borrow_direct.error";

pub const BASE_ERROR_CLASS: &str = "borrow-direct-error";
pub const DANGER_ERROR_CLASSES: [&str; 2] = ["alert", "alert-danger"];

/// Message-catalog keys handed to the rendering layer. Never looked up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageKeys {
    /// Spinner text while a submitted request is being placed.
    pub status_progress: String,
    /// Spinner text while eligibility is still being checked.
    pub prompt_progress: String,
    pub submission_error: String,
    pub section_error: String,
}

impl Default for MessageKeys {
    fn default() -> Self {
        Self {
            status_progress: STATUS_PROGRESS_KEY.to_string(),
            prompt_progress: PROMPT_PROGRESS_KEY.to_string(),
            submission_error: SUBMISSION_ERROR_KEY.to_string(),
            section_error: SECTION_ERROR_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorClasses {
    pub base: String,
    /// Appended after `base` when the submission itself failed.
    pub danger: Vec<String>,
}

impl Default for ErrorClasses {
    fn default() -> Self {
        Self {
            base: BASE_ERROR_CLASS.to_string(),
            danger: DANGER_ERROR_CLASSES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub message_keys: MessageKeys,
    pub error_classes: ErrorClasses,
    /// Service-type tags whose still-running state keeps the panel spinning.
    pub service_types: BTreeSet<String>,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            message_keys: MessageKeys::default(),
            error_classes: ErrorClasses::default(),
            service_types: RECOGNIZED_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl PanelConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
