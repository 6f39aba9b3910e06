//! Focus System - Where focus goes after each mutation.
//!
//! Manages focus movement across the boxes of one code input:
//! - Initial focus on box 0, attempted until it lands once
//! - Auto-advance after typed input, blur at the end of entry
//! - Step back after Backspace on an empty box
//!
//! The rules are pure; the widget applies the resulting [`FocusMove`] to the
//! render host's handles.
//!
//! # Example
//!
//! ```ignore
//! use spark_pin::state::focus::{after_input, FocusMove};
//!
//! // Typed "12" into box 1 of a 4-box code
//! assert_eq!(after_input(1, 2, 4), FocusMove::Focus(3));
//! // Typed into the last box
//! assert_eq!(after_input(3, 1, 4), FocusMove::Blur);
//! ```

use crate::host::BoxHandle;

// =============================================================================
// FOCUS MOVES
// =============================================================================

/// Focus change requested by a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusMove {
    /// Focus the box at this position.
    Focus(usize),
    /// Remove focus from the box that received the event.
    Blur,
    /// Leave focus where it is.
    Stay,
}

/// Focus after `consumed` characters were typed starting at `start`.
///
/// Moves to the box after the last one written, or blurs when that would be
/// past the last box.
pub fn after_input(start: usize, consumed: usize, box_count: usize) -> FocusMove {
    let next = start + consumed;
    if next >= box_count {
        FocusMove::Blur
    } else {
        FocusMove::Focus(next)
    }
}

/// Focus after Backspace at `index`.
///
/// Only an already-empty box hands focus to its left neighbour.
pub fn after_backspace(index: usize, was_empty: bool) -> FocusMove {
    if was_empty && index > 0 {
        FocusMove::Focus(index - 1)
    } else {
        FocusMove::Stay
    }
}

/// Apply a move to a handle list. `origin` is the box that got the event.
pub fn apply<H: BoxHandle>(handles: &[H], origin: usize, focus_move: FocusMove) {
    match focus_move {
        FocusMove::Focus(index) => {
            if let Some(handle) = handles.get(index) {
                tracing::trace!(index, "focus box");
                handle.focus();
            }
        }
        FocusMove::Blur => {
            if let Some(handle) = handles.get(origin) {
                tracing::trace!(index = origin, "blur box");
                handle.blur();
            }
        }
        FocusMove::Stay => {}
    }
}

// =============================================================================
// INITIAL FOCUS
// =============================================================================

/// One-shot initial focus on the first box.
///
/// Each render pass may attempt it; once an attempt lands, it is never tried
/// again so user-initiated focus changes are left alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusController {
    enabled: bool,
    settled: bool,
}

impl FocusController {
    /// Create a controller; `enabled = false` disables initial focus entirely.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            settled: false,
        }
    }

    /// Check if an attempt should be made this pass.
    pub fn should_attempt(&self) -> bool {
        self.enabled && !self.settled
    }

    /// Record whether the attempt actually landed.
    pub fn record(&mut self, landed: bool) {
        if landed {
            self.settled = true;
        }
    }

    /// Check if initial focus has landed.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Check if initial focus is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for FocusController {
    fn default() -> Self {
        Self::new(true)
    }
}

// =============================================================================
// TESTS
// =============================================================================
