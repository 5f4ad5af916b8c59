//! Export configuration and its binding from a parameter store.
//!
//! Fields are bound by name through a fixed table of setters. A parameter that
//! names no field, or whose value does not parse, is logged and skipped; it never
//! aborts the rest of the load.

use crate::domain::ports::ParameterStore;
use crate::domain::transaction::SubsidiaryTransactions;
use crate::error::Result;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("field {0:?} does not exist in the configuration")]
    UnknownField(String),
    #[error("field {field:?} rejected value: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Directory the batch documents are saved to.
    pub output_dir: PathBuf,
    /// Subsidiaries to export. Empty means all of them.
    pub subsidiaries: Vec<String>,
    /// Print the documents as JSON instead of saving them.
    pub emit_json: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            subsidiaries: Vec::new(),
            emit_json: false,
        }
    }
}

type FieldSetter = fn(&mut ExportConfig, &str) -> std::result::Result<(), String>;

const FIELDS: &[(&str, FieldSetter)] = &[
    ("OutputDir", set_output_dir),
    ("Subsidiaries", set_subsidiaries),
    ("EmitJson", set_emit_json),
];

fn set_output_dir(cfg: &mut ExportConfig, value: &str) -> std::result::Result<(), String> {
    if value.is_empty() {
        return Err("must not be empty".to_string());
    }
    cfg.output_dir = PathBuf::from(value);
    Ok(())
}

fn set_subsidiaries(cfg: &mut ExportConfig, value: &str) -> std::result::Result<(), String> {
    cfg.subsidiaries = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();
    Ok(())
}

fn set_emit_json(cfg: &mut ExportConfig, value: &str) -> std::result::Result<(), String> {
    cfg.emit_json = value.trim().parse::<bool>().map_err(|e| e.to_string())?;
    Ok(())
}

/// Sets the configuration field called `name` from its string form.
pub fn set_field(
    cfg: &mut ExportConfig,
    name: &str,
    value: &str,
) -> std::result::Result<(), ConfigError> {
    let (_, setter) = FIELDS
        .iter()
        .find(|(field, _)| *field == name)
        .ok_or_else(|| ConfigError::UnknownField(name.to_string()))?;

    setter(cfg, value).map_err(|reason| ConfigError::InvalidValue {
        field: name.to_string(),
        reason,
    })
}

/// Reads every parameter under `path` and binds it onto `cfg`.
///
/// Only failures of the store itself are returned.
pub async fn read_parameter_store(
    store: &dyn ParameterStore,
    path: &str,
    cfg: &mut ExportConfig,
) -> Result<()> {
    tracing::info!(path, "reading parameters from parameter store");

    let mut token = None;
    loop {
        let page = store.parameters_by_path(path, token).await?;
        if page.parameters.is_empty() {
            break;
        }

        for parameter in page.parameters {
            let Some(full_name) = parameter.name else {
                tracing::warn!("parameter store returned a parameter with no name");
                continue;
            };
            let name = full_name.strip_prefix(path).unwrap_or(&full_name);
            let name = name.strip_prefix('/').unwrap_or(name);

            let Some(value) = parameter.value else {
                tracing::warn!(name, "parameter store returned a parameter with no value");
                continue;
            };

            match set_field(cfg, name, &value) {
                Ok(()) => tracing::info!(name, "parameter read from parameter store"),
                Err(e) => tracing::warn!(name, error = %e, "skipping parameter"),
            }
        }

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    Ok(())
}

impl ExportConfig {
    /// Keeps the batches of the configured subsidiaries, in their original order.
    pub fn select(&self, batches: Vec<SubsidiaryTransactions>) -> Vec<SubsidiaryTransactions> {
        if self.subsidiaries.is_empty() {
            return batches;
        }
        batches
            .into_iter()
            .filter(|b| self.subsidiaries.contains(&b.subsidiary))
            .collect()
    }
}
