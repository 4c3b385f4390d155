//! Reportable conditions and the sinks that receive them.
//!
//! Readers and writers never abort the process. Every failure they return is
//! also handed to a [`Reporter`] first, and conditions they can survive (a
//! padding pattern that is too short, an output path that already exists) are
//! only reported.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use crate::error::CodecError;

/// A condition worth telling the operator about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The charset label could not be resolved.
    UnsupportedEncoding { label: String },
    /// An input file did not exist when it was opened.
    MissingFile { path: PathBuf },
    /// The part counter has more digits than the padding pattern.
    PaddingOverflow { part_index: usize, pattern: String },
    /// A rotated part path already existed and will be overwritten.
    DuplicateOutputPath { path: PathBuf },
    /// A fixed-width line was shorter than its column layout.
    RangeFailure { message: String },
    /// Any other storage failure.
    IoFailure { path: PathBuf, message: String },
    /// A configuration value was rejected.
    InvalidConfig { key: String, message: String },
}

impl Condition {
    /// Whether the operation that raised this condition failed.
    pub fn is_failure(&self) -> bool {
        !matches!(
            self,
            Condition::PaddingOverflow { .. } | Condition::DuplicateOutputPath { .. }
        )
    }
}

impl From<&CodecError> for Condition {
    fn from(err: &CodecError) -> Self {
        match err {
            CodecError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                Condition::MissingFile { path: path.clone() }
            }
            CodecError::Io { path, source } => Condition::IoFailure {
                path: path.clone(),
                message: source.to_string(),
            },
            CodecError::Encoding { label } => Condition::UnsupportedEncoding {
                label: label.clone(),
            },
            CodecError::Range { .. } => Condition::RangeFailure {
                message: err.to_string(),
            },
            CodecError::Config { key, message } => Condition::InvalidConfig {
                key: key.clone(),
                message: message.clone(),
            },
        }
    }
}

/// Receives conditions from readers and writers.
pub trait Reporter {
    fn report(&self, condition: Condition);

    /// Report `err` and hand it back, for use in `map_err`.
    fn surface(&self, err: CodecError) -> CodecError {
        self.report(Condition::from(&err));
        err
    }
}

/// Default reporter: emits every condition as a `tracing` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, condition: Condition) {
        match condition {
            Condition::UnsupportedEncoding { label } => {
                tracing::error!(label = %label, "unsupported charset");
            }
            Condition::MissingFile { path } => {
                tracing::error!(path = %path.display(), "file does not exist");
            }
            Condition::PaddingOverflow {
                part_index,
                pattern,
            } => {
                tracing::warn!(
                    part_index,
                    pattern = %pattern,
                    "part index has more digits than the padding format"
                );
            }
            Condition::DuplicateOutputPath { path } => {
                tracing::warn!(path = %path.display(), "output part already exists, overwriting");
            }
            Condition::RangeFailure { message } => {
                tracing::error!(error = %message, "fixed-width layout does not fit the line");
            }
            Condition::IoFailure { path, message } => {
                tracing::error!(path = %path.display(), error = %message, "io failure");
            }
            Condition::InvalidConfig { key, message } => {
                tracing::error!(key = %key, error = %message, "invalid configuration");
            }
        }
    }
}

/// Reporter that keeps every condition in memory.
///
/// Clones share the same storage, so a test can keep one handle and give
/// the other to a reader or writer.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    conditions: Rc<RefCell<Vec<Condition>>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn conditions(&self) -> Vec<Condition> {
        self.conditions.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.borrow().is_empty()
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, condition: Condition) {
        self.conditions.borrow_mut().push(condition);
    }
}
