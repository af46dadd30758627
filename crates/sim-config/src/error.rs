//! `ConfigError` is fatal: any occurrence aborts the run before a single
//! event is scheduled.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("missing required config key '{key}'")]
    MissingKey { key: String },

    #[error("config key '{key}' has invalid numeric value '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("config key '{key}' has invalid boolean value '{value}'")]
    InvalidBool { key: String, value: String },

    #[error("node.hashPowerChanges: {0}")]
    HashPowerGrammar(#[from] HashPowerGrammarError),
}

/// Errors in the `node.hashPowerChanges` string grammar:
/// `'{' entry (',' entry)* '}'`, `entry = integer ':' float ':' integer`.
#[derive(Debug, Error)]
pub enum HashPowerGrammarError {
    #[error("expected a string wrapped in '{{' and '}}', got '{input}'")]
    MissingBrackets { input: String },

    #[error("expected 'node:power:time', got '{entry}'")]
    WrongArity { entry: String },

    #[error("field '{field}' in entry '{entry}' is not numeric")]
    NonNumericField { entry: String, field: String },

    #[error("hashpower {value} cannot be negative")]
    NegativeHashpower { value: f64 },

    #[error("time {time} cannot be negative")]
    NegativeTime { time: i64 },
}
