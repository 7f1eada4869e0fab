//! Error types for index construction and persistence.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type ProximityResult<T> = Result<T, ProximityError>;

/// Errors raised while building, validating or loading a proximity index.
///
/// Degenerate geometry (NaN distances, zero-area faces) is not an error: the
/// candidate is treated as infinitely far away and the build continues.
#[derive(Debug, Error)]
pub enum ProximityError {
  /// Rejected configuration, raised before any work starts.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// Internal count/fill disagreement. The index would be corrupt.
  #[error("invariant violation: {0}")]
  InvariantViolation(String),

  /// Malformed caller input (counts, mesh connectivity).
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// Underlying I/O failure while reading or writing a file.
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  /// A persisted file is truncated or inconsistent.
  #[error("invalid file format: {0}")]
  Format(String),
}

impl ProximityError {
  pub fn configuration(message: impl Into<String>) -> Self {
    Self::Configuration(message.into())
  }

  pub fn invariant(message: impl Into<String>) -> Self {
    Self::InvariantViolation(message.into())
  }

  pub fn invalid_input(message: impl Into<String>) -> Self {
    Self::InvalidInput(message.into())
  }

  pub fn format(message: impl Into<String>) -> Self {
    Self::Format(message.into())
  }
}
