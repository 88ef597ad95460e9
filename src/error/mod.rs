// Error types for the sound core
//
// This module defines the error type for platform audio lifecycle and volume
// operations, providing structured error handling with numeric codes that
// match the categorized diagnostics the engine's log scrapers key on.

mod sound;

pub use sound::{log_sound_error, SoundError, SoundErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// subsystem boundaries.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
