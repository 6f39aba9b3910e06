//! Box Registry - Rendered box handles and their states.
//!
//! Two parallel arrays, always the same length:
//!
//! ```text
//! Index 0: handle=<box 0>  state=Ready
//! Index 1: handle=<box 1>  state=Reset
//! Index 2: handle=<box 2>  state=Ready
//! ```
//!
//! The arrays only ever grow or shrink at the tail. Reconciling against the
//! rendered list appends unknown handles (state Ready) or truncates, and is
//! idempotent so it can run from a change notification that fires repeatedly.
//!
//! # Deferred writes
//!
//! Mutations update the state array right away but return the value change as
//! a [`BoxWrite`]. Box values are usually signals with effects attached, and
//! those effects may read the widget back, so callers release every borrow of
//! the registry before applying:
//!
//! ```ignore
//! let writes = registry.borrow_mut().default_writes(Some("1234"), &rule);
//! apply_writes(writes);
//! ```

use crate::host::BoxHandle;
use crate::types::{BoxId, BoxState};
use crate::validation::ValidationRule;

/// What a reconcile pass did to the tracked list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reconciled {
    /// Handles appended at the tail.
    Grew(usize),
    /// Handles dropped from the tail.
    Shrank(usize),
    /// Same length as before.
    Unchanged,
}

impl Reconciled {
    /// Check if the tracked list changed length.
    pub fn is_changed(self) -> bool {
        self != Self::Unchanged
    }
}

// =============================================================================
// Pending Writes
// =============================================================================

/// A value change for one box, not yet pushed to its handle.
#[must_use = "box writes do nothing until applied"]
pub struct BoxWrite<H: BoxHandle> {
    index: usize,
    handle: H,
    value: String,
}

impl<H: BoxHandle> BoxWrite<H> {
    /// Position of the box.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Value to be written (empty clears).
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Push the value to the handle.
    pub fn apply(self) {
        self.handle.set_value(&self.value);
    }
}

/// Apply writes in order.
pub fn apply_writes<H, I>(writes: I)
where
    H: BoxHandle,
    I: IntoIterator<Item = BoxWrite<H>>,
{
    for write in writes {
        write.apply();
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Tracked box handles plus per-box state, in lockstep.
pub struct BoxRegistry<H: BoxHandle> {
    handles: Vec<H>,
    states: Vec<BoxState>,
}

impl<H: BoxHandle> BoxRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
            states: Vec::new(),
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Match the tracked list to the rendered one by count.
    pub fn reconcile(&mut self, rendered: &[H]) -> Reconciled {
        let tracked = self.handles.len();

        let result = if rendered.len() > tracked {
            self.handles.extend(rendered[tracked..].iter().cloned());
            self.states.resize(rendered.len(), BoxState::Ready);
            Reconciled::Grew(rendered.len() - tracked)
        } else if rendered.len() < tracked {
            self.handles.truncate(rendered.len());
            self.states.truncate(rendered.len());
            Reconciled::Shrank(tracked - rendered.len())
        } else {
            Reconciled::Unchanged
        };

        assert_eq!(
            self.handles.len(),
            self.states.len(),
            "box handles and states out of lockstep"
        );
        result
    }

    /// Writes that pre-fill boxes from a default value, all or nothing.
    ///
    /// Absent/empty defaults clear every box. A default with any character the
    /// rule rejects also clears every box. Otherwise characters go to boxes by
    /// position and boxes past the end are cleared.
    pub fn default_writes(
        &mut self,
        default: Option<&str>,
        rule: &ValidationRule,
    ) -> Vec<BoxWrite<H>> {
        let chars: Vec<char> = default
            .map(str::trim)
            .unwrap_or_default()
            .chars()
            .collect();

        if chars.is_empty() || !chars.iter().all(|&ch| rule.allows(ch)) {
            return self.clear_all();
        }

        (0..self.handles.len())
            .filter_map(|index| match chars.get(index) {
                Some(&ch) => self.write(index, ch),
                None => self.clear(index),
            })
            .collect()
    }

    // =========================================================================
    // Box Mutation
    // =========================================================================

    /// Write one accepted character; the box leaves the Reset state.
    pub fn write(&mut self, index: usize, ch: char) -> Option<BoxWrite<H>> {
        let handle = self.handles.get(index)?.clone();
        self.states[index] = BoxState::Ready;
        Some(BoxWrite {
            index,
            handle,
            value: ch.to_string(),
        })
    }

    /// Empty a box. State is left as is.
    pub fn clear(&self, index: usize) -> Option<BoxWrite<H>> {
        let handle = self.handles.get(index)?.clone();
        Some(BoxWrite {
            index,
            handle,
            value: String::new(),
        })
    }

    /// Empty a box after a rejected character and flag it.
    pub fn reject(&mut self, index: usize) -> Option<BoxWrite<H>> {
        let write = self.clear(index)?;
        self.states[index] = BoxState::Reset;
        Some(write)
    }

    /// Empty every box.
    pub fn clear_all(&self) -> Vec<BoxWrite<H>> {
        (0..self.handles.len())
            .filter_map(|index| self.clear(index))
            .collect()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of tracked boxes.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Check if no box is tracked.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Handle at a position.
    pub fn handle(&self, index: usize) -> Option<&H> {
        self.handles.get(index)
    }

    /// All tracked handles.
    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    /// State at a position.
    pub fn state(&self, index: usize) -> Option<BoxState> {
        self.states.get(index).copied()
    }

    /// All states, in box order.
    pub fn states(&self) -> &[BoxState] {
        &self.states
    }

    /// Position of a handle by id.
    pub fn position(&self, id: BoxId) -> Option<usize> {
        self.handles.iter().position(|h| h.id() == id)
    }

    /// Current text of every box, in order.
    pub fn values(&self) -> Vec<String> {
        self.handles.iter().map(|h| h.value()).collect()
    }
}

impl<H: BoxHandle> Default for BoxRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
