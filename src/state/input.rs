//! Input Module - crossterm event conversion and polling
//!
//! Bridges crossterm's event system to the code input's host-agnostic events.
//! Terminal front ends poll here and hand the result to
//! [`CodeInput::dispatch`](crate::CodeInput::dispatch).
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `convert_event` - Convert any crossterm Event to an InputEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `enable_paste` / `disable_paste` - Control bracketed paste
//!
//! # Example
//!
//! ```ignore
//! use spark_pin::state::input::{poll_event, InputEvent};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         pin.dispatch(&event);
//!     }
//! }
//! ```

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers, poll, read,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::keyboard::{BACKSPACE_KEY_CODE, DELETE_KEY_CODE, KeyState, KeyboardEvent, Modifiers};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type consumed by the code input
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// Pasted text (bracketed paste)
    Paste(String),
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        key_code: legacy_key_code(event.code),
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

/// Legacy numeric code for the keys that have a stable one.
fn legacy_key_code(code: KeyCode) -> Option<u32> {
    match code {
        KeyCode::Backspace => Some(BACKSPACE_KEY_CODE),
        KeyCode::Delete => Some(DELETE_KEY_CODE),
        KeyCode::Tab => Some(9),
        KeyCode::Enter => Some(13),
        KeyCode::Esc => Some(27),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => Some(c.to_ascii_uppercase() as u32),
        _ => None,
    }
}

// =============================================================================
// MODIFIER CONVERSION
// =============================================================================

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// EVENT CONVERSION & POLLING
// =============================================================================

/// Convert a crossterm event.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Paste(text) => {
            tracing::trace!(bytes = text.len(), "paste received");
            InputEvent::Paste(text)
        }
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

// =============================================================================
// BRACKETED PASTE
// =============================================================================

/// Enable bracketed paste so pastes arrive as one event.
pub fn enable_paste() -> std::io::Result<()> {
    execute!(stdout(), EnableBracketedPaste)
}

/// Disable bracketed paste.
pub fn disable_paste() -> std::io::Result<()> {
    execute!(stdout(), DisableBracketedPaste)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_key_char() {
        let event = convert_key_event(key(KeyCode::Char('7'), KeyModifiers::empty()));

        assert_eq!(event.key, "7");
        assert_eq!(event.key_code, Some('7' as u32));
        assert_eq!(event.state, KeyState::Press);
        assert!(!event.modifiers.ctrl);
    }

    #[test]
    fn test_convert_letter_key_code_is_uppercase() {
        let event = convert_key_event(key(KeyCode::Char('a'), KeyModifiers::empty()));
        assert_eq!(event.key, "a");
        assert_eq!(event.key_code, Some(65));
    }

    #[test]
    fn test_convert_deletion_keys() {
        let event = convert_key_event(key(KeyCode::Backspace, KeyModifiers::empty()));
        assert_eq!(event.key, "Backspace");
        assert_eq!(event.key_code, Some(BACKSPACE_KEY_CODE));

        let event = convert_key_event(key(KeyCode::Delete, KeyModifiers::empty()));
        assert_eq!(event.key, "Delete");
        assert_eq!(event.key_code, Some(DELETE_KEY_CODE));
    }

    #[test]
    fn test_convert_modifiers() {
        let event = convert_key_event(key(
            KeyCode::Char('v'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        ));
        assert!(event.modifiers.ctrl);
        assert!(event.modifiers.shift);
        assert!(!event.modifiers.alt);
        assert_eq!(event.printable_char(), None);
    }

    #[test]
    fn test_convert_release() {
        let mut raw = key(KeyCode::Char('1'), KeyModifiers::empty());
        raw.kind = KeyEventKind::Release;
        let event = convert_key_event(raw);
        assert_eq!(event.state, KeyState::Release);
        assert!(!event.is_press());
    }

    #[test]
    fn test_convert_paste_and_resize() {
        assert_eq!(
            convert_event(CrosstermEvent::Paste("1234".to_string())),
            InputEvent::Paste("1234".to_string())
        );
        assert_eq!(convert_event(CrosstermEvent::Resize(80, 24)), InputEvent::Resize(80, 24));
        assert_eq!(convert_event(CrosstermEvent::FocusGained), InputEvent::None);
    }

    #[test]
    fn test_unmapped_key() {
        let event = convert_key_event(key(KeyCode::F(5), KeyModifiers::empty()));
        assert_eq!(event.key, "");
        assert_eq!(event.key_code, None);
    }
}
