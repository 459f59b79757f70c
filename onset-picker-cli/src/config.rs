//! Configuration loading and parsing

use anyhow::{Context, Result};
use onset_picker::{ColumnNames, FailurePolicy, PickerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration (loaded from an optional TOML file)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub columns: ColumnNames,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamingConfig {
    #[serde(default = "default_task_marker")]
    pub task_marker: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Empty string disables the site prefix rule
    #[serde(default = "default_site_prefix")]
    pub site_prefix: String,
    #[serde(default = "default_pre_visit_letters")]
    pub pre_visit_letters: Vec<char>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            task_marker: default_task_marker(),
            extension: default_extension(),
            site_prefix: default_site_prefix(),
            pre_visit_letters: default_pre_visit_letters(),
        }
    }
}

fn default_task_marker() -> String {
    PickerConfig::default().task_marker
}

fn default_extension() -> String {
    PickerConfig::default().extension
}

fn default_site_prefix() -> String {
    PickerConfig::default().site_prefix.unwrap_or_default()
}

fn default_pre_visit_letters() -> Vec<char> {
    PickerConfig::default().pre_visit_letters
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub fail_fast: bool,
}

impl AppConfig {
    /// Apply command-line overrides
    pub fn with_overrides(mut self, output_dir: Option<PathBuf>, fail_fast: bool) -> Self {
        if output_dir.is_some() {
            self.output.output_dir = output_dir;
        }
        self.processing.fail_fast |= fail_fast;
        self
    }

    /// Build the library configuration
    pub fn to_picker_config(&self) -> PickerConfig {
        let site_prefix = Some(self.naming.site_prefix.clone()).filter(|p| !p.is_empty());
        let policy = if self.processing.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Isolate
        };

        let mut config = PickerConfig::new()
            .with_task_marker(self.naming.task_marker.clone())
            .with_extension(self.naming.extension.clone())
            .with_site_prefix(site_prefix)
            .with_pre_visit_letters(self.naming.pre_visit_letters.clone())
            .with_columns(self.columns.clone())
            .with_failure_policy(policy);
        if let Some(dir) = &self.output.output_dir {
            config = config.with_output_dir(dir);
        }
        config
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
