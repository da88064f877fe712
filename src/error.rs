// Wingbit Error Handling Module
// Errors raised by builtins, by the interpreter seam and by session setup

use std::fmt;
use thiserror::Error;

/// Exception kinds a builtin can raise inside the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TypeError,
    ValueError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::TypeError => write!(f, "TypeError"),
            ErrorKind::ValueError => write!(f, "ValueError"),
        }
    }
}

/// An error raised by a native function. The interpreter turns it into a
/// script-level exception; nothing on the native side recovers from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("function takes {expected} {} but {given} {} given", arguments(.expected), were(.given))]
    ArgumentCount { expected: usize, given: usize },

    #[error("argument {} must be of type {expected}, not {found}", .index + 1)]
    ArgumentType {
        index: usize,
        expected: &'static str,
        found: String,
    },

    #[error("{0}")]
    Value(String),
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::ArgumentCount { .. } | ScriptError::ArgumentType { .. } => {
                ErrorKind::TypeError
            }
            ScriptError::Value(_) => ErrorKind::ValueError,
        }
    }

    pub fn value(message: impl Into<String>) -> Self {
        ScriptError::Value(message.into())
    }
}

fn arguments(n: &usize) -> &'static str {
    if *n == 1 {
        "argument"
    } else {
        "arguments"
    }
}

fn were(n: &usize) -> &'static str {
    if *n == 1 {
        "was"
    } else {
        "were"
    }
}

/// Failures of the interpreter seam itself (not script errors)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("failed to create interpreter instance")]
    CreateFailed,

    #[error("failed to bind native function '{0}'")]
    Function(String),

    #[error("failed to register module '{0}'")]
    Module(String),

    #[error("source text contains a NUL byte")]
    NulInSource,
}

/// Why a session could not be opened
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error("live interpreter: {0}")]
    LiveInstance(EngineError),

    #[error("expression checker: {0}")]
    CheckerInstance(EngineError),
}

impl OpenError {
    /// Non-zero status handed to the host; tells which instance failed.
    pub fn status(&self) -> i32 {
        match self {
            OpenError::LiveInstance(_) => 1,
            OpenError::CheckerInstance(_) => 2,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}
