//! Render Host - The collaborator that owns the actual boxes.
//!
//! The widget never lays out or draws anything. A render host supplies box
//! handles, answers "which box is active", notifies when the handle list is
//! replaced, and re-renders when the code length changes.
//!
//! - [`BoxHandle`] - One rendered character box
//! - [`RenderHost`] - Box list owner with change subscription
//! - [`headless`] - In-memory host for tests and terminal front ends

pub mod headless;

use std::rc::Rc;

use crate::primitives::Cleanup;
use crate::types::BoxId;

pub use headless::{HeadlessBox, HeadlessHost};

/// A single rendered character box.
pub trait BoxHandle: Clone + 'static {
    /// Stable id, compared against [`RenderHost::active_box`].
    fn id(&self) -> BoxId;

    /// Current text of the box.
    fn value(&self) -> String;

    /// Replace the text of the box. Empty string clears it.
    fn set_value(&self, value: &str);

    /// Move keyboard focus to this box.
    fn focus(&self);

    /// Remove keyboard focus from this box (no-op if not focused).
    fn blur(&self);

    /// Caret / selection start, when the host can report it.
    fn selection_start(&self) -> Option<usize>;
}

/// Listener invoked with the full handle list after it is replaced.
pub type BoxListListener<H> = Rc<dyn Fn(&[H])>;

/// Owner of the rendered box list.
pub trait RenderHost: 'static {
    /// Handle type for one box.
    type Handle: BoxHandle;

    /// Currently rendered boxes, in order.
    fn boxes(&self) -> Vec<Self::Handle>;

    /// Id of the box holding keyboard focus, if any.
    fn active_box(&self) -> Option<BoxId>;

    /// Subscribe to box list changes. The returned cleanup unsubscribes.
    fn subscribe(&self, listener: BoxListListener<Self::Handle>) -> Cleanup;

    /// Code length changed: render `slots` boxes (now or on a later pass).
    fn request_render(&self, slots: usize);
}
