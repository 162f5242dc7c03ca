//! Multi-format config reading.
//!
//! Dispatches on file extension (YAML, JSON, TOML, INI/CFG) when given a
//! path, or sniffs the format from content when given a raw string. All
//! backends normalize into a [`Tree`] of string / string-list leaves;
//! scalars are stringified, the core performs no type coercion.
//!
//! INI/CFG files cannot represent lists natively; list-like values arrive
//! as comma-joined strings and splitting them is left to the caller.

use std::path::Path;

use crate::error::ConfigError;
use crate::value::{Tree, Value};

/// Reads and parses the config file at `path`, choosing the backend from
/// the file extension.
pub fn read_config(path: &Path) -> Result<Tree, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("yaml") | Some("yml") => parse_yaml(&content, path),
        Some("json") => parse_json(&content, path),
        Some("toml") => parse_toml(&content, path),
        Some("ini") | Some("cfg") => parse_ini(&content, path),
        _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
    }
}

/// Parses config content of unknown provenance, sniffing the format.
///
/// Tries JSON, then TOML, then YAML; the first backend producing a
/// top-level mapping wins.
pub fn read_config_str(content: &str) -> Result<Tree, ConfigError> {
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(content) {
        return json_map_to_tree(map);
    }
    if let Ok(table) = toml::from_str::<toml::Table>(content) {
        return toml_table_to_tree(table);
    }
    if let Ok(serde_yaml::Value::Mapping(map)) = serde_yaml::from_str(content) {
        return yaml_mapping_to_tree(map);
    }
    Err(ConfigError::UnrecognizedContent)
}

fn parse_yaml(content: &str, path: &Path) -> Result<Tree, ConfigError> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| ConfigError::YamlError {
            path: path.to_path_buf(),
            source: e,
        })?;
    match value {
        serde_yaml::Value::Mapping(map) => yaml_mapping_to_tree(map),
        _ => Err(ConfigError::UnsupportedValue(path.display().to_string())),
    }
}

fn parse_json(content: &str, path: &Path) -> Result<Tree, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| ConfigError::JsonError {
            path: path.to_path_buf(),
            source: e,
        })?;
    match value {
        serde_json::Value::Object(map) => json_map_to_tree(map),
        _ => Err(ConfigError::UnsupportedValue(path.display().to_string())),
    }
}

fn parse_toml(content: &str, path: &Path) -> Result<Tree, ConfigError> {
    let table: toml::Table = toml::from_str(content).map_err(|e| ConfigError::TomlError {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml_table_to_tree(table)
}

/// Section-based INI/CFG parsing: `[Section]` headers, `key = value` or
/// `key: value` pairs, `#` and `;` comments. Keys outside a section are
/// rejected, matching the behavior of section-requiring INI dialects.
fn parse_ini(content: &str, path: &Path) -> Result<Tree, ConfigError> {
    let malformed = |line: usize| ConfigError::IniError {
        path: path.to_path_buf(),
        line,
    };

    let mut tree = Tree::new();
    let mut current: Option<(String, Tree)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header.strip_suffix(']').ok_or_else(|| malformed(idx + 1))?;
            if let Some((done_name, done)) = current.take() {
                tree.insert_branch(done_name, done);
            }
            current = Some((name.trim().to_string(), Tree::new()));
            continue;
        }

        let split_at = line
            .find(|c: char| c == '=' || c == ':')
            .ok_or_else(|| malformed(idx + 1))?;
        let (key, rest) = line.split_at(split_at);
        let value = &rest[1..];

        let (_, section) = current.as_mut().ok_or_else(|| malformed(idx + 1))?;
        section.insert_leaf(key.trim(), value.trim());
    }

    if let Some((name, section)) = current {
        tree.insert_branch(name, section);
    }
    Ok(tree)
}

fn yaml_mapping_to_tree(map: serde_yaml::Mapping) -> Result<Tree, ConfigError> {
    let mut tree = Tree::new();
    for (key, value) in map {
        let key = yaml_scalar_to_string(&key)
            .ok_or_else(|| ConfigError::UnsupportedValue(format!("{key:?}")))?;
        match value {
            serde_yaml::Value::Mapping(nested) => {
                tree.insert_branch(key, yaml_mapping_to_tree(nested)?);
            }
            serde_yaml::Value::Sequence(items) => {
                let items = items
                    .iter()
                    .map(yaml_scalar_to_string)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| ConfigError::UnsupportedValue(key.clone()))?;
                tree.insert_leaf(key, Value::List(items));
            }
            scalar => {
                let s = yaml_scalar_to_string(&scalar)
                    .ok_or_else(|| ConfigError::UnsupportedValue(key.clone()))?;
                tree.insert_leaf(key, s);
            }
        }
    }
    Ok(tree)
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        serde_yaml::Value::Null => Some(String::new()),
        _ => None,
    }
}

fn json_map_to_tree(map: serde_json::Map<String, serde_json::Value>) -> Result<Tree, ConfigError> {
    let mut tree = Tree::new();
    for (key, value) in map {
        match value {
            serde_json::Value::Object(nested) => {
                tree.insert_branch(key, json_map_to_tree(nested)?);
            }
            serde_json::Value::Array(items) => {
                let items = items
                    .iter()
                    .map(json_scalar_to_string)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| ConfigError::UnsupportedValue(key.clone()))?;
                tree.insert_leaf(key, Value::List(items));
            }
            scalar => {
                let s = json_scalar_to_string(&scalar)
                    .ok_or_else(|| ConfigError::UnsupportedValue(key.clone()))?;
                tree.insert_leaf(key, s);
            }
        }
    }
    Ok(tree)
}

fn json_scalar_to_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Null => Some(String::new()),
        _ => None,
    }
}

fn toml_table_to_tree(table: toml::Table) -> Result<Tree, ConfigError> {
    let mut tree = Tree::new();
    for (key, value) in table {
        match value {
            toml::Value::Table(nested) => {
                tree.insert_branch(key, toml_table_to_tree(nested)?);
            }
            toml::Value::Array(items) => {
                let items = items
                    .iter()
                    .map(toml_scalar_to_string)
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| ConfigError::UnsupportedValue(key.clone()))?;
                tree.insert_leaf(key, Value::List(items));
            }
            scalar => {
                let s = toml_scalar_to_string(&scalar)
                    .ok_or_else(|| ConfigError::UnsupportedValue(key.clone()))?;
                tree.insert_leaf(key, s);
            }
        }
    }
    Ok(tree)
}

fn toml_scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        toml::Value::Datetime(dt) => Some(dt.to_string()),
        toml::Value::Array(_) | toml::Value::Table(_) => None,
    }
}
