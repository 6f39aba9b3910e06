//! Primitive Types - Props and callback types for components.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::state::completion::COMPLETION_DEBOUNCE;
use crate::state::keyboard::COMPOSITION_KEY_CODE;
use crate::validation::ValidationRule;

// =============================================================================
// Cleanup Type
// =============================================================================

/// Cleanup function returned by subscriptions and components.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Completed code callback (Rc so it can be captured by deferred tasks).
pub type OnComplete = Rc<dyn Fn(&str)>;

// =============================================================================
// Code Input Props
// =============================================================================

/// Default mask character in secret mode.
pub const DEFAULT_MASK_CHAR: char = '•';

/// Properties for the segmented code input.
///
/// Construct with struct update syntax:
///
/// ```ignore
/// let props = CodeInputProps {
///     code_length: 6,
///     on_complete: Some(Rc::new(|code| println!("{code}"))),
///     ..Default::default()
/// };
/// ```
#[derive(Clone)]
pub struct CodeInputProps {
    /// Number of boxes (must be positive).
    pub code_length: usize,

    /// Which characters a box accepts (default: ASCII digits).
    pub validation: ValidationRule,

    /// Pre-filled value, applied all-or-nothing on every render.
    pub default_value: Option<String>,

    /// Focus the first box on first render (default: true).
    pub initial_focus: bool,

    /// Show a mask instead of the characters.
    pub secret: bool,

    /// Mask character in secret mode (default: `•`).
    pub mask_char: Option<char>,

    /// Delay between the last edit and code assembly.
    pub debounce: Duration,

    /// Key code that marks a key-down during IME composition.
    /// `None` disables the deferred Backspace check.
    pub composition_key_code: Option<u32>,

    /// Called with the code once every box is filled.
    pub on_complete: Option<OnComplete>,
}

impl Default for CodeInputProps {
    fn default() -> Self {
        Self {
            code_length: 4,
            validation: ValidationRule::digits(),
            default_value: None,
            initial_focus: true,
            secret: false,
            mask_char: None,
            debounce: COMPLETION_DEBOUNCE,
            composition_key_code: Some(COMPOSITION_KEY_CODE),
            on_complete: None,
        }
    }
}

impl fmt::Debug for CodeInputProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeInputProps")
            .field("code_length", &self.code_length)
            .field("validation", &self.validation)
            .field("default_value", &self.default_value)
            .field("initial_focus", &self.initial_focus)
            .field("secret", &self.secret)
            .field("mask_char", &self.mask_char)
            .field("debounce", &self.debounce)
            .field("composition_key_code", &self.composition_key_code)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_props_defaults() {
        let props = CodeInputProps::default();
        assert_eq!(props.code_length, 4);
        assert!(props.initial_focus);
        assert!(props.default_value.is_none());
        assert!(!props.secret);
        assert_eq!(props.debounce, Duration::from_millis(50));
        assert_eq!(props.composition_key_code, Some(229));
        assert!(props.validation.validate("0123456789"));
    }
}
