//! Config show subcommand
//!
//! Displays the current context in table or JSON format. Fields are
//! flattened to dotted keys; tokens are masked in both formats.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use nsai_core::config::validation::{display_validation_error, display_validation_warning, validate_config};
use nsai_core::config::{ConfigStore, LocalConfig};
use serde_json::Value;

/// Fields that should have their values masked in output
const SENSITIVE_FIELDS: &[&str] = &["auth_token", "cluster_token"];

const MASK: &str = "********";

/// Show the stored config
///
/// A missing config file is an error: there is nothing to show until the
/// user has signed in.
pub fn cmd_config_show(store: &ConfigStore, json: bool) -> Result<()> {
    let config = store.load()?;
    if json {
        return show_json(&config);
    }
    show_table(&config, store)
}

fn show_json(config: &LocalConfig) -> Result<()> {
    println!("{}", masked_json(config)?);
    Ok(())
}

fn show_table(config: &LocalConfig, store: &ConfigStore) -> Result<()> {
    let value = serde_json::to_value(config)?;

    let mut table = Table::new();
    table.set_header(vec!["Key", "Value"]);
    for (key, val) in flatten(&value) {
        let display_value = format_value(&key, &val);
        let cell = if display_value == "(not set)" {
            Cell::new(display_value).fg(Color::Yellow)
        } else {
            Cell::new(display_value)
        };
        table.add_row(vec![Cell::new(key), cell]);
    }
    if config.cluster.is_none() {
        table.add_row(vec![
            Cell::new("cluster"),
            Cell::new("(none selected)").fg(Color::Yellow),
        ]);
    }
    println!("{table}");

    println!();
    println!("Config file: {}", store.path().display());

    match validate_config(config) {
        Ok(warnings) => {
            for warning in &warnings {
                display_validation_warning(warning);
            }
        }
        Err(error) => {
            display_validation_error(&error);
        }
    }
    Ok(())
}

/// Flatten nested objects into `parent.child` keys, in document order
fn flatten(value: &Value) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(String::new(), value, &mut out);
    out
}

fn flatten_into(prefix: String, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(obj) => {
            for (key, val) in obj {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(path, val, out);
            }
        }
        other => out.push((prefix, other.clone())),
    }
}

/// Format a JSON value for display
fn format_value(key: &str, value: &Value) -> String {
    let leaf = key.rsplit('.').next().unwrap_or(key);
    match value {
        Value::String(s) if s.is_empty() => "(not set)".to_string(),
        Value::String(_) if SENSITIVE_FIELDS.contains(&leaf) => MASK.to_string(),
        Value::String(s) => s.clone(),
        Value::Null => "(not set)".to_string(),
        other => other.to_string(),
    }
}

/// Mask sensitive fields in a JSON Value, at any depth
fn mask_sensitive_fields(value: &mut Value) {
    let Value::Object(obj) = value else {
        return;
    };

    for (key, val) in obj.iter_mut() {
        if val.is_object() {
            mask_sensitive_fields(val);
            continue;
        }
        if !SENSITIVE_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let Value::String(s) = val else {
            continue;
        };
        if !s.is_empty() {
            *val = Value::String(MASK.to_string());
        }
    }
}

fn masked_json(config: &LocalConfig) -> Result<String> {
    let mut value = serde_json::to_value(config).context("Failed to encode config")?;
    mask_sensitive_fields(&mut value);
    Ok(serde_json::to_string_pretty(&value)?)
}
