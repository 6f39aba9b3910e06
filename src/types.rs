//! Core Types - Shared vocabulary for the code input widget.
//!
//! These types are the common language between the registry, the focus and
//! completion state systems, and whatever render layer hosts the boxes.

// =============================================================================
// Box Identity
// =============================================================================

/// Stable identifier of a rendered character box.
///
/// Assigned by the render host. The widget only compares ids (e.g. against the
/// host's active element), it never interprets them.
pub type BoxId = usize;

// =============================================================================
// Box State
// =============================================================================

/// Per-box state tag consumed by the render layer for visual feedback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BoxState {
    /// Normal state.
    #[default]
    Ready,
    /// The last character written to this box was rejected.
    Reset,
}

impl BoxState {
    /// Check if the box is flagged after a rejected character.
    pub fn is_reset(self) -> bool {
        self == Self::Reset
    }
}

// =============================================================================
// Event Outcome
// =============================================================================

/// Result of feeding one UI event into the widget.
///
/// Default-action suppression depends on the event kind:
/// - typed input suppresses only when `Rejected`
/// - paste always suppresses
/// - key-down suppresses when `Applied`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing happened (empty input, unmatched key, unknown box).
    Ignored,
    /// Boxes were mutated.
    Applied,
    /// A character failed validation; the target box was cleared and flagged.
    Rejected,
    /// Resolution postponed to the next event-loop turn.
    Deferred,
}

impl EventOutcome {
    /// Check if the event had any effect (now or scheduled).
    pub fn is_handled(self) -> bool {
        self != Self::Ignored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_state_default_is_ready() {
        assert_eq!(BoxState::default(), BoxState::Ready);
        assert!(!BoxState::Ready.is_reset());
        assert!(BoxState::Reset.is_reset());
    }

    #[test]
    fn test_event_outcome_handled() {
        assert!(!EventOutcome::Ignored.is_handled());
        assert!(EventOutcome::Applied.is_handled());
        assert!(EventOutcome::Rejected.is_handled());
        assert!(EventOutcome::Deferred.is_handled());
    }
}
