//! Validation Rule - Which characters a box accepts.
//!
//! A rule is a predicate over a single character. Multi-character input is valid
//! only when it is non-empty and every character passes.
//!
//! # Example
//!
//! ```ignore
//! use spark_pin::ValidationRule;
//!
//! let digits = ValidationRule::digits();
//! assert!(digits.validate("1234"));
//! assert!(!digits.validate("12a4"));
//!
//! let hex = ValidationRule::pattern("[0-9A-Fa-f]")?;
//! assert!(hex.allows('c'));
//! ```

use std::fmt;
use std::rc::Rc;

use regex::Regex;

use crate::error::CodeInputResult;

#[derive(Clone)]
enum RuleKind {
    Digits,
    Pattern(Regex),
    Custom(Rc<dyn Fn(char) -> bool>),
}

/// Predicate applied to typed, pasted and default characters.
#[derive(Clone)]
pub struct ValidationRule {
    kind: RuleKind,
}

impl ValidationRule {
    /// ASCII digits only (the default).
    pub fn digits() -> Self {
        Self { kind: RuleKind::Digits }
    }

    /// Characters matching a regex.
    ///
    /// The pattern is wrapped in an anchored group and tested against one
    /// character at a time, so `"[0-9A-F]"` and `"^[0-9A-F]$"` behave the same.
    pub fn pattern(pattern: &str) -> CodeInputResult<Self> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self { kind: RuleKind::Pattern(regex) })
    }

    /// Characters accepted by a closure.
    pub fn from_fn<F>(predicate: F) -> Self
    where
        F: Fn(char) -> bool + 'static,
    {
        Self { kind: RuleKind::Custom(Rc::new(predicate)) }
    }

    /// Check a single character.
    pub fn allows(&self, ch: char) -> bool {
        match &self.kind {
            RuleKind::Digits => ch.is_ascii_digit(),
            RuleKind::Pattern(regex) => {
                let mut buf = [0u8; 4];
                regex.is_match(ch.encode_utf8(&mut buf))
            }
            RuleKind::Custom(predicate) => predicate(ch),
        }
    }

    /// Check a whole value. Empty values never validate.
    pub fn validate(&self, value: &str) -> bool {
        !value.is_empty() && value.chars().all(|ch| self.allows(ch))
    }
}

impl Default for ValidationRule {
    fn default() -> Self {
        Self::digits()
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RuleKind::Digits => f.write_str("ValidationRule::Digits"),
            RuleKind::Pattern(regex) => write!(f, "ValidationRule::Pattern({})", regex.as_str()),
            RuleKind::Custom(_) => f.write_str("ValidationRule::Custom"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
