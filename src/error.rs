//! Code input error types.
//!
//! Only configuration can fail. User input never produces an error: invalid
//! characters degrade to a cleared box flagged [`BoxState::Reset`].
//!
//! [`BoxState::Reset`]: crate::types::BoxState::Reset

use thiserror::Error;

/// Result type for code input configuration.
pub type CodeInputResult<T> = Result<T, CodeInputError>;

/// Errors raised while configuring a code input.
#[derive(Debug, Error)]
pub enum CodeInputError {
    /// Code length of zero
    #[error("Code length must be positive")]
    ZeroLength,

    /// Validation pattern failed to compile
    #[error("Invalid validation pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_length_displays() {
        assert_eq!(
            CodeInputError::ZeroLength.to_string(),
            "Code length must be positive"
        );
    }

    #[test]
    fn test_invalid_pattern_wraps_regex_error() {
        let regex_err = regex::Regex::new("[0-9").unwrap_err();
        let err = CodeInputError::from(regex_err);
        assert!(err.to_string().starts_with("Invalid validation pattern"));
    }
}
