//! Headless Host - In-memory render collaborator.
//!
//! Keeps box values and the active box in spark-signals, so a reactive front end
//! (or a test) can read them directly. Rendering is synchronous: `render(n)`
//! grows or truncates the box list and notifies subscribers right away.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_pin::{code_input, CodeInputProps, HeadlessHost};
//!
//! let host = Rc::new(HeadlessHost::new());
//! let pin = code_input(host.clone(), CodeInputProps::default())?;
//!
//! pin.on_character_input("1", 0);
//! assert_eq!(host.values(), vec!["1", "", "", ""]);
//! assert_eq!(host.focused_index(), Some(1));
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::{BoxHandle, BoxListListener, RenderHost};
use crate::primitives::Cleanup;
use crate::types::BoxId;

// =============================================================================
// Shared Focus State
// =============================================================================

struct FocusState {
    /// Id of the focused box (None = nothing focused)
    active: Signal<Option<BoxId>>,
    /// When set, focus() calls do not land (hidden document, modal elsewhere)
    blocked: Cell<bool>,
}

// =============================================================================
// Headless Box
// =============================================================================

/// One in-memory character box.
#[derive(Clone)]
pub struct HeadlessBox {
    id: BoxId,
    value: Signal<String>,
    selection_start: Rc<Cell<usize>>,
    focus: Rc<FocusState>,
}

impl HeadlessBox {
    /// Reactive value signal for render bindings.
    pub fn value_signal(&self) -> Signal<String> {
        self.value.clone()
    }

    /// Move the caret (simulates the browser applying a key event).
    pub fn set_selection_start(&self, position: usize) {
        self.selection_start.set(position);
    }

    /// Check if this box holds focus.
    pub fn is_focused(&self) -> bool {
        self.focus.active.get() == Some(self.id)
    }
}

impl BoxHandle for HeadlessBox {
    fn id(&self) -> BoxId {
        self.id
    }

    fn value(&self) -> String {
        self.value.get()
    }

    fn set_value(&self, value: &str) {
        // Programmatic writes leave the caret after the text
        self.selection_start.set(value.chars().count());
        self.value.set(value.to_string());
    }

    fn focus(&self) {
        if self.focus.blocked.get() {
            return;
        }
        self.focus.active.set(Some(self.id));
    }

    fn blur(&self) {
        if self.is_focused() {
            self.focus.active.set(None);
        }
    }

    fn selection_start(&self) -> Option<usize> {
        Some(self.selection_start.get())
    }
}

// =============================================================================
// Headless Host
// =============================================================================

type ListenerList = Rc<RefCell<Vec<(usize, BoxListListener<HeadlessBox>)>>>;

/// In-memory box list owner.
pub struct HeadlessHost {
    focus: Rc<FocusState>,
    boxes: RefCell<Vec<HeadlessBox>>,
    listeners: ListenerList,
    next_box_id: Cell<BoxId>,
    next_listener_id: Cell<usize>,
}

impl HeadlessHost {
    /// Create a host with no boxes rendered yet.
    pub fn new() -> Self {
        Self {
            focus: Rc::new(FocusState {
                active: signal(None),
                blocked: Cell::new(false),
            }),
            boxes: RefCell::new(Vec::new()),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_box_id: Cell::new(0),
            next_listener_id: Cell::new(0),
        }
    }

    /// Render exactly `count` boxes: append fresh ones or drop from the tail.
    ///
    /// Subscribers are notified only when the list actually changed.
    pub fn render(&self, count: usize) {
        let mut lost_focus = false;
        let changed = {
            let mut boxes = self.boxes.borrow_mut();
            let before = boxes.len();

            while boxes.len() < count {
                let id = self.next_box_id.get();
                self.next_box_id.set(id + 1);
                boxes.push(HeadlessBox {
                    id,
                    value: signal(String::new()),
                    selection_start: Rc::new(Cell::new(0)),
                    focus: self.focus.clone(),
                });
            }

            if boxes.len() > count {
                // Focus does not survive its box being destroyed
                lost_focus = boxes[count..].iter().any(|b| b.is_focused());
                boxes.truncate(count);
            }

            boxes.len() != before
        };

        if lost_focus {
            self.focus.active.set(None);
        }

        if changed {
            self.notify();
        }
    }

    /// Fire the change notification with the current list.
    pub fn notify(&self) {
        // Snapshot so listeners may subscribe/unsubscribe while being called
        let listeners: Vec<BoxListListener<HeadlessBox>> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        let boxes = self.boxes();

        for listener in listeners {
            listener(&boxes);
        }
    }

    /// Number of rendered boxes.
    pub fn len(&self) -> usize {
        self.boxes.borrow().len()
    }

    /// Check if no box is rendered.
    pub fn is_empty(&self) -> bool {
        self.boxes.borrow().is_empty()
    }

    /// Box at a position.
    pub fn box_at(&self, index: usize) -> Option<HeadlessBox> {
        self.boxes.borrow().get(index).cloned()
    }

    /// All box values, in order.
    pub fn values(&self) -> Vec<String> {
        self.boxes.borrow().iter().map(|b| b.value.get()).collect()
    }

    /// Position of the focused box.
    pub fn focused_index(&self) -> Option<usize> {
        let active = self.focus.active.get()?;
        self.boxes.borrow().iter().position(|b| b.id == active)
    }

    /// Reactive active-box signal.
    pub fn active_signal(&self) -> Signal<Option<BoxId>> {
        self.focus.active.clone()
    }

    /// Simulate the user clicking into a box.
    pub fn click(&self, index: usize) -> bool {
        match self.box_at(index) {
            Some(b) => {
                b.focus();
                b.is_focused()
            }
            None => false,
        }
    }

    /// Make every focus() call fail to land (or succeed again).
    pub fn set_focus_blocked(&self, blocked: bool) {
        self.focus.blocked.set(blocked);
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderHost for HeadlessHost {
    type Handle = HeadlessBox;

    fn boxes(&self) -> Vec<HeadlessBox> {
        self.boxes.borrow().clone()
    }

    fn active_box(&self) -> Option<BoxId> {
        self.focus.active.get()
    }

    fn subscribe(&self, listener: BoxListListener<HeadlessBox>) -> Cleanup {
        let id = self.next_listener_id.get();
        self.next_listener_id.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));

        let listeners = self.listeners.clone();
        Box::new(move || {
            listeners.borrow_mut().retain(|(listener_id, _)| *listener_id != id);
        })
    }

    fn request_render(&self, slots: usize) {
        self.render(slots);
    }
}

// =============================================================================
// Tests
// =============================================================================
