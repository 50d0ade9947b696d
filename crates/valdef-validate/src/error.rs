use std::fmt;

use serde::Serialize;
use valdef_definition::DefinitionError;

/// One path-addressed failure of the data against its definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Path of the offending value, e.g. `value.body.checkpoints[1]`.
    pub path: String,
    /// Full message, path included.
    pub message: String,
    /// For `either` failures: the violations of each alternative, in order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inner: Vec<Vec<Violation>>,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            inner: Vec::new(),
        }
    }

    pub fn with_inner(mut self, inner: Vec<Vec<Violation>>) -> Self {
        self.inner = inner;
        self
    }

    /// This message followed by every nested alternative message, depth first.
    pub fn flatten(&self) -> Vec<String> {
        let mut messages = vec![self.message.clone()];
        for alternative in &self.inner {
            for violation in alternative {
                messages.extend(violation.flatten());
            }
        }
        messages
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Errors that make a validation call fail outright.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// The definition is unusable.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// `assert` mode hit its first violation.
    #[error("assertion failed: {0}")]
    Assertion(Violation),

    /// The value has violations (returned by `Validator::validate`).
    #[error("validation failed: {}", join(.0))]
    Rejected(Vec<Violation>),
}

impl ValidateError {
    /// Violations carried by this error, if it is about the data.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ValidateError::Assertion(violation) => std::slice::from_ref(violation),
            ValidateError::Rejected(violations) => violations,
            ValidateError::Definition(_) => &[],
        }
    }
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|violation| violation.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ValidateError>;
