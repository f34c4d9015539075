use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort generation. Nothing is written once one of these
/// is returned.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parameter description must be a JSON object keyed by identifier")]
    NotAnObject,
    #[error("parameter '{ident}': entry must be a JSON object")]
    EntryNotAnObject { ident: String },
    #[error("parameter '{ident}': missing required key '{key}'")]
    MissingKey { ident: String, key: &'static str },
    #[error("parameter '{ident}': unknown type '{tag}'")]
    UnknownType { ident: String, tag: String },
    #[error("'{ident}' is not a valid identifier")]
    BadIdentifier { ident: String },
    #[error("parameters '{first}' and '{second}' both map to enum constant {constant}")]
    DuplicateConstant {
        first: String,
        second: String,
        constant: String,
    },
    #[error("enum constant {constant} for '{ident}' collides with a field name")]
    ConstantShadowsField { ident: String, constant: String },
    #[error("parameter '{ident}': {key} {reason}")]
    BadValue {
        ident: String,
        key: &'static str,
        reason: String,
    },
    #[error("parameter '{ident}': type '{tag}' cannot be stored in a Uniform")]
    NotUniform { ident: String, tag: &'static str },
    #[error("unknown parameter code {0}")]
    UnknownCode(usize),
    #[error("parameter '{ident}' (code {code}) is {tag}, cannot be set with {setter}")]
    SetterMismatch {
        ident: String,
        code: usize,
        setter: &'static str,
        tag: &'static str,
    },
    #[error("parameter '{ident}' has {expected} components, setter passed {actual}")]
    DimensionMismatch {
        ident: String,
        expected: usize,
        actual: usize,
    },
    #[error("parameter '{ident}': index {index} out of range for length {len}")]
    IndexOutOfRange {
        ident: String,
        index: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, ParamError>;
