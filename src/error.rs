use std::path::PathBuf;

use thiserror::Error;

use crate::key::KeyChain;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot find referenced config '{0}'")]
    ConfigNotFound(String),

    #[error("unresolved substitution reference(s): {}", join_chains(.0))]
    UnresolvedReference(Vec<KeyChain>),

    #[error("circular include detected at '{0}'")]
    CircularInclude(PathBuf),

    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML config '{path}': {source}")]
    YamlError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON config '{path}': {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to parse TOML config '{path}': {source}")]
    TomlError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("malformed INI config '{path}' at line {line}")]
    IniError { path: PathBuf, line: usize },

    #[error("unrecognized config format: '{0}'")]
    UnknownFormat(PathBuf),

    #[error("config content matches no supported format")]
    UnrecognizedContent,

    #[error("config value at '{0}' is not a string, list of strings, or mapping")]
    UnsupportedValue(String),

    #[error("no config source was provided")]
    MissingSource,
}

fn join_chains(chains: &[KeyChain]) -> String {
    chains
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
