//! Keyboard Module - Key events and deletion intent.
//!
//! Key events carry both a key identifier ("Backspace", "a") and, when the
//! platform reports one, a legacy numeric key code. The code input only cares
//! about deletion, so events are classified into a [`KeyIntent`].
//!
//! # Composition keys
//!
//! While an IME composition is active some platforms report every key-down with
//! a placeholder key code (229) instead of the real key. A Backspace is then only
//! recognisable after the event settles, by the caret sitting at position 0.
//! That case is classified as [`KeyIntent::MaybeBackspace`] and resolved later by
//! the widget.
//!
//! # Example
//!
//! ```ignore
//! use spark_pin::state::keyboard::{classify, KeyboardEvent, KeyIntent, COMPOSITION_KEY_CODE};
//!
//! let event = KeyboardEvent::new("Backspace");
//! assert_eq!(classify(&event, Some(COMPOSITION_KEY_CODE)), KeyIntent::Backspace);
//! ```

// =============================================================================
// KEY CODES
// =============================================================================

/// Legacy key code for Backspace.
pub const BACKSPACE_KEY_CODE: u32 = 8;

/// Legacy key code for Delete.
pub const DELETE_KEY_CODE: u32 = 46;

/// Key code reported for key-downs during IME composition.
pub const COMPOSITION_KEY_CODE: u32 = 229;

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with alt
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Check if any modifier that turns a key into a shortcut is held
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Backspace", "Delete")
    pub key: String,
    /// Legacy numeric key code, when the platform reports one
    pub key_code: Option<u32>,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_code: None,
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            modifiers,
            ..Self::new(key)
        }
    }

    /// Create a key press identified only by its key code
    pub fn from_key_code(key_code: u32) -> Self {
        Self {
            key_code: Some(key_code),
            ..Self::new("")
        }
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// The typed character, for a single printable key without shortcut modifiers
    pub fn printable_char(&self) -> Option<char> {
        if self.modifiers.is_command() {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}

// =============================================================================
// INTENT
// =============================================================================

/// What a key-down means to the code input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyIntent {
    /// Clear the box, step back if it was already empty.
    Backspace,
    /// Clear the box, focus stays.
    Delete,
    /// Composition key: a Backspace if the caret turns out to be at 0.
    MaybeBackspace,
    /// Anything else.
    Other,
}

/// Check if the event is a Backspace.
pub fn is_backspace(event: &KeyboardEvent) -> bool {
    event.key.eq_ignore_ascii_case("backspace") || event.key_code == Some(BACKSPACE_KEY_CODE)
}

/// Check if the event is a forward Delete.
pub fn is_delete(event: &KeyboardEvent) -> bool {
    event.key.eq_ignore_ascii_case("delete") || event.key_code == Some(DELETE_KEY_CODE)
}

/// Classify a key-down.
///
/// `composition_key_code` is the placeholder code the platform uses during IME
/// composition; `None` disables the deferred Backspace path.
pub fn classify(event: &KeyboardEvent, composition_key_code: Option<u32>) -> KeyIntent {
    if is_backspace(event) {
        KeyIntent::Backspace
    } else if is_delete(event) {
        KeyIntent::Delete
    } else if composition_key_code.is_some() && event.key_code == composition_key_code {
        KeyIntent::MaybeBackspace
    } else {
        KeyIntent::Other
    }
}

// =============================================================================
// TESTS
// =============================================================================
