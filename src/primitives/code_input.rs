//! Code Input Primitive - Segmented PIN / one-time-code entry.
//!
//! A row of single-character boxes that behave as one logical field.
//!
//! # Features
//!
//! - Per-box validation (digits by default, regex or closure)
//! - Multi-character bursts spread across boxes, overflow dropped
//! - Paste fills from the origin box, aborting at the first invalid character
//! - Auto-advance on input, step back on Backspace in an empty box
//! - One-shot initial focus on the first box
//! - Debounced completion callback once every box is filled
//! - Secret mode with configurable mask
//!
//! The widget owns no rendering. A [`RenderHost`] supplies the boxes and tells the
//! widget when its list changes; the widget writes values, moves focus, and tags
//! boxes whose last character was rejected.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use spark_pin::{code_input, CodeInputProps, HeadlessHost};
//! use spark_pin::state::scheduler;
//!
//! let host = Rc::new(HeadlessHost::new());
//! let pin = code_input(host.clone(), CodeInputProps {
//!     code_length: 4,
//!     on_complete: Some(Rc::new(|code| println!("entered {code}"))),
//!     ..Default::default()
//! })?;
//!
//! pin.on_paste("1234", 0);
//! scheduler::advance(std::time::Duration::from_millis(50)); // prints "entered 1234"
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::types::{Cleanup, CodeInputProps, DEFAULT_MASK_CHAR, OnComplete};
use crate::engine::{BoxRegistry, Reconciled, apply_writes};
use crate::error::{CodeInputError, CodeInputResult};
use crate::host::{BoxHandle, RenderHost};
use crate::state::completion::{Debouncer, complete_code};
use crate::state::focus::{self, FocusController};
use crate::state::input::InputEvent;
use crate::state::keyboard::{KeyIntent, KeyboardEvent, classify};
use crate::state::scheduler;
use crate::types::{BoxState, EventOutcome};
use crate::validation::ValidationRule;

// =============================================================================
// Internal State
// =============================================================================

/// Runtime-mutable configuration.
struct Config {
    code_length: usize,
    validation: ValidationRule,
    default_value: Option<String>,
    secret: bool,
    mask_char: char,
    composition_key_code: Option<u32>,
}

struct Inner<H: RenderHost> {
    host: Rc<H>,
    config: RefCell<Config>,
    registry: RefCell<BoxRegistry<H::Handle>>,
    focus: Cell<FocusController>,
    completion: Debouncer,
    on_complete: Option<OnComplete>,
    last_code: Signal<Option<String>>,
    subscription: RefCell<Option<Cleanup>>,
}

impl<H: RenderHost> Inner<H> {
    // =========================================================================
    // Box List Changes
    // =========================================================================

    /// Match the tracked boxes to the rendered list. The default is re-applied
    /// only when the list actually changed.
    fn reconcile(&self, rendered: &[H::Handle]) {
        let (result, writes) = {
            let mut registry = self.registry.borrow_mut();
            let result = registry.reconcile(rendered);
            let writes = if result.is_changed() {
                let config = self.config.borrow();
                registry.default_writes(config.default_value.as_deref(), &config.validation)
            } else {
                Vec::new()
            };
            (result, writes)
        };
        apply_writes(writes);

        match result {
            Reconciled::Grew(added) => tracing::debug!(added, "boxes appended"),
            Reconciled::Shrank(removed) => tracing::debug!(removed, "boxes truncated"),
            Reconciled::Unchanged => tracing::trace!("box list unchanged"),
        }
    }

    /// Initial focus attempt, until one lands.
    fn after_render(&self) {
        let mut controller = self.focus.get();
        if !controller.should_attempt() {
            return;
        }

        let Some(first) = self.registry.borrow().handle(0).cloned() else {
            return;
        };
        first.focus();

        let landed = self.host.active_box() == Some(first.id());
        controller.record(landed);
        self.focus.set(controller);
        tracing::trace!(landed, "initial focus attempt");
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Number of boxes edits may touch.
    fn writable_len(&self) -> usize {
        let code_length = self.config.borrow().code_length;
        code_length.min(self.registry.borrow().len())
    }

    fn handles(&self) -> Vec<H::Handle> {
        self.registry.borrow().handles().to_vec()
    }

    fn schedule_completion(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.completion.schedule(move || {
            if let Some(inner) = weak.upgrade() {
                inner.emit_if_complete();
            }
        });
    }

    fn emit_if_complete(&self) {
        let values = self.registry.borrow().values();
        let code_length = self.config.borrow().code_length;

        let Some(code) = complete_code(&values, code_length) else {
            tracing::trace!("code incomplete, nothing emitted");
            return;
        };

        tracing::debug!(length = code.chars().count(), "code complete");
        self.last_code.set(Some(code.clone()));
        if let Some(ref on_complete) = self.on_complete {
            on_complete(&code);
        }
    }

    /// Clear a box after Backspace or Delete.
    fn clear_box(self: &Rc<Self>, index: usize, was_empty: bool) {
        let write = self.registry.borrow().clear(index);
        apply_writes(write);
        if !was_empty {
            self.schedule_completion();
        }
    }

    fn backspace(self: &Rc<Self>, index: usize, was_empty: bool) {
        self.clear_box(index, was_empty);
        let focus_move = focus::after_backspace(index, was_empty);
        focus::apply(&self.handles(), index, focus_move);
    }
}

impl<H: RenderHost> Drop for Inner<H> {
    fn drop(&mut self) {
        self.completion.cancel();
        if let Some(unsubscribe) = self.subscription.get_mut().take() {
            unsubscribe();
        }
    }
}

// =============================================================================
// Code Input Component
// =============================================================================

/// Mounted segmented code input.
///
/// Cloning shares the same widget. The host subscription is released on
/// [`unmount`](Self::unmount) or when the last clone is dropped.
pub struct CodeInput<H: RenderHost> {
    inner: Rc<Inner<H>>,
}

impl<H: RenderHost> Clone for CodeInput<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Mount a segmented code input on a render host.
///
/// Subscribes to box list changes, asks the host to render `code_length` boxes,
/// tracks whatever is rendered so far and makes the initial focus attempt.
///
/// # Errors
///
/// [`CodeInputError::ZeroLength`] when `props.code_length` is 0.
pub fn code_input<H: RenderHost>(
    host: Rc<H>,
    props: CodeInputProps,
) -> CodeInputResult<CodeInput<H>> {
    if props.code_length == 0 {
        return Err(CodeInputError::ZeroLength);
    }

    let code_length = props.code_length;
    let inner = Rc::new(Inner {
        host,
        config: RefCell::new(Config {
            code_length,
            validation: props.validation,
            default_value: props.default_value,
            secret: props.secret,
            mask_char: props.mask_char.unwrap_or(DEFAULT_MASK_CHAR),
            composition_key_code: props.composition_key_code,
        }),
        registry: RefCell::new(BoxRegistry::new()),
        focus: Cell::new(FocusController::new(props.initial_focus)),
        completion: Debouncer::new(props.debounce),
        on_complete: props.on_complete,
        last_code: signal(None),
        subscription: RefCell::new(None),
    });

    // ==========================================================================
    // BOX LIST SUBSCRIPTION
    // ==========================================================================

    let weak = Rc::downgrade(&inner);
    let unsubscribe = inner.host.subscribe(Rc::new(move |boxes: &[H::Handle]| {
        if let Some(inner) = weak.upgrade() {
            inner.reconcile(boxes);
            inner.after_render();
        }
    }));
    *inner.subscription.borrow_mut() = Some(unsubscribe);

    // ==========================================================================
    // FIRST RENDER
    // ==========================================================================

    inner.host.request_render(code_length);
    inner.reconcile(&inner.host.boxes());
    inner.after_render();

    if inner.registry.borrow().is_empty() {
        tracing::warn!(code_length, "code input mounted but host rendered no boxes");
    }
    tracing::debug!(code_length, "code input mounted");

    Ok(CodeInput { inner })
}

impl<H: RenderHost> CodeInput<H> {
    // =========================================================================
    // Event Handlers
    // =========================================================================

    /// Typed input arriving in box `start`.
    ///
    /// Returns [`EventOutcome::Rejected`] when the value fails validation: the
    /// box is cleared, flagged [`BoxState::Reset`], and the caller should
    /// suppress the default edit.
    pub fn on_character_input(&self, raw: &str, start: usize) -> EventOutcome {
        if raw.is_empty() || start >= self.inner.writable_len() {
            return EventOutcome::Ignored;
        }

        let valid = self.inner.config.borrow().validation.validate(raw);
        if !valid {
            let write = self.inner.registry.borrow_mut().reject(start);
            apply_writes(write);
            tracing::debug!(index = start, "typed input rejected");
            return EventOutcome::Rejected;
        }

        let limit = self.inner.writable_len();
        let writes: Vec<_> = {
            let mut registry = self.inner.registry.borrow_mut();
            (start..limit)
                .zip(raw.trim().chars())
                .filter_map(|(index, ch)| registry.write(index, ch))
                .collect()
        };
        let consumed = writes.len();
        apply_writes(writes);
        tracing::trace!(index = start, consumed, "typed input applied");

        self.inner.schedule_completion();

        let focus_move = focus::after_input(start, consumed, limit);
        focus::apply(&self.inner.handles(), start, focus_move);
        EventOutcome::Applied
    }

    /// Pasted text arriving in box `start`. The caller always suppresses the
    /// native paste.
    ///
    /// An invalid character clears and flags its box and aborts the paste;
    /// boxes written before it keep their values.
    pub fn on_paste(&self, text: &str, start: usize) -> EventOutcome {
        let text = text.trim();
        let limit = self.inner.writable_len();
        if text.is_empty() || start >= limit {
            return EventOutcome::Ignored;
        }

        let (writes, rejected) = {
            let config = self.inner.config.borrow();
            let mut registry = self.inner.registry.borrow_mut();
            let mut writes = Vec::new();
            let mut rejected = None;
            for (index, ch) in (start..limit).zip(text.chars()) {
                if !config.validation.allows(ch) {
                    writes.extend(registry.reject(index));
                    rejected = Some(index);
                    break;
                }
                writes.extend(registry.write(index, ch));
            }
            (writes, rejected)
        };
        apply_writes(writes);

        if let Some(index) = rejected {
            tracing::debug!(index, "paste aborted on invalid character");
            return EventOutcome::Rejected;
        }
        tracing::trace!(index = start, "paste applied");

        focus::apply(&self.inner.handles(), start, focus::FocusMove::Blur);
        self.inner.schedule_completion();
        EventOutcome::Applied
    }

    /// Key-down in box `index`.
    ///
    /// Delete clears the box. Backspace clears it and, when it was already
    /// empty, focuses the previous box. A composition key is resolved on the
    /// next turn of the event loop ([`EventOutcome::Deferred`]): it counts as
    /// Backspace only if the caret then sits at position 0.
    pub fn on_key_down(&self, event: &KeyboardEvent, index: usize) -> EventOutcome {
        let Some(handle) = self.inner.registry.borrow().handle(index).cloned() else {
            return EventOutcome::Ignored;
        };
        let was_empty = handle.value().is_empty();
        let composition_key_code = self.inner.config.borrow().composition_key_code;

        match classify(event, composition_key_code) {
            KeyIntent::Delete => {
                self.inner.clear_box(index, was_empty);
                tracing::trace!(index, "delete");
                EventOutcome::Applied
            }
            KeyIntent::Backspace => {
                self.inner.backspace(index, was_empty);
                tracing::trace!(index, was_empty, "backspace");
                EventOutcome::Applied
            }
            KeyIntent::MaybeBackspace => {
                let weak = Rc::downgrade(&self.inner);
                scheduler::next_turn(move || {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    if handle.selection_start() != Some(0) {
                        return;
                    }
                    // The box may have moved or gone since the key-down
                    let position = inner.registry.borrow().position(handle.id());
                    if let Some(index) = position {
                        tracing::trace!(index, "composition key resolved as backspace");
                        inner.backspace(index, was_empty);
                    }
                });
                EventOutcome::Deferred
            }
            KeyIntent::Other => EventOutcome::Ignored,
        }
    }

    /// Route an input event to the focused box.
    ///
    /// Printable keys go to [`on_character_input`](Self::on_character_input),
    /// deletion and composition keys to [`on_key_down`](Self::on_key_down),
    /// pastes to [`on_paste`](Self::on_paste). Only key presses are routed.
    pub fn dispatch(&self, event: &InputEvent) -> EventOutcome {
        let Some(index) = self.active_index() else {
            return EventOutcome::Ignored;
        };

        match event {
            InputEvent::Key(key) if key.is_press() => {
                let composition_key_code = self.inner.config.borrow().composition_key_code;
                match classify(key, composition_key_code) {
                    KeyIntent::Other => match key.printable_char() {
                        Some(ch) => {
                            let mut buf = [0u8; 4];
                            self.on_character_input(ch.encode_utf8(&mut buf), index)
                        }
                        None => EventOutcome::Ignored,
                    },
                    _ => self.on_key_down(key, index),
                }
            }
            InputEvent::Paste(text) => self.on_paste(text, index),
            _ => EventOutcome::Ignored,
        }
    }

    // =========================================================================
    // Render Integration
    // =========================================================================

    /// Re-sync with the host's current box list.
    ///
    /// Hosts that cannot notify may call this after each render. A pass that
    /// finds the same number of boxes changes nothing.
    pub fn reconcile(&self) {
        let boxes = self.inner.host.boxes();
        self.inner.reconcile(&boxes);
    }

    /// Hook for the end of each render pass (initial focus attempt).
    pub fn after_render(&self) {
        self.inner.after_render();
    }

    /// Release the host subscription and drop any pending completion.
    pub fn unmount(&self) {
        self.inner.completion.cancel();
        let unsubscribe = self.inner.subscription.borrow_mut().take();
        if let Some(unsubscribe) = unsubscribe {
            unsubscribe();
            tracing::debug!("code input unmounted");
        }
    }

    /// Check if the host subscription is still live.
    pub fn is_mounted(&self) -> bool {
        self.inner.subscription.borrow().is_some()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Change the number of boxes. The host re-renders and the registry
    /// follows on the next box list notification.
    pub fn set_code_length(&self, code_length: usize) -> CodeInputResult<()> {
        if code_length == 0 {
            return Err(CodeInputError::ZeroLength);
        }

        let previous = std::mem::replace(
            &mut self.inner.config.borrow_mut().code_length,
            code_length,
        );
        if previous != code_length {
            tracing::debug!(from = previous, to = code_length, "code length changed");
            self.inner.host.request_render(code_length);
        }
        Ok(())
    }

    /// Configured number of boxes.
    pub fn code_length(&self) -> usize {
        self.inner.config.borrow().code_length
    }

    /// Replace the default value and apply it right away.
    pub fn set_default_value(&self, default_value: Option<String>) {
        let writes = {
            let mut config = self.inner.config.borrow_mut();
            config.default_value = default_value;
            self.inner
                .registry
                .borrow_mut()
                .default_writes(config.default_value.as_deref(), &config.validation)
        };
        apply_writes(writes);
    }

    /// Swap the validation rule. Existing values are left as they are.
    pub fn set_validation(&self, rule: ValidationRule) {
        self.inner.config.borrow_mut().validation = rule;
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current value of every tracked box.
    pub fn values(&self) -> Vec<String> {
        self.inner.registry.borrow().values()
    }

    /// State tag of every tracked box.
    pub fn box_states(&self) -> Vec<BoxState> {
        self.inner.registry.borrow().states().to_vec()
    }

    /// State tag of one box.
    pub fn box_state(&self, index: usize) -> Option<BoxState> {
        self.inner.registry.borrow().state(index)
    }

    /// Number of tracked boxes.
    pub fn box_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Text the render layer should show for a box (masked in secret mode).
    pub fn display_value(&self, index: usize) -> Option<String> {
        let value = self.inner.registry.borrow().handle(index)?.value();
        let config = self.inner.config.borrow();
        if config.secret {
            Some(config.mask_char.to_string().repeat(value.chars().count()))
        } else {
            Some(value)
        }
    }

    /// Position of the box holding focus.
    pub fn active_index(&self) -> Option<usize> {
        let active = self.inner.host.active_box()?;
        self.inner.registry.borrow().position(active)
    }

    /// Most recently emitted code.
    pub fn last_code(&self) -> Option<String> {
        self.inner.last_code.get()
    }

    /// Reactive signal of the most recently emitted code.
    pub fn last_code_signal(&self) -> Signal<Option<String>> {
        self.inner.last_code.clone()
    }

    /// Check if the initial focus attempt has landed.
    pub fn is_focus_settled(&self) -> bool {
        self.inner.focus.get().is_settled()
    }

    /// Check if a completion check is waiting on the debounce.
    pub fn is_completion_pending(&self) -> bool {
        self.inner.completion.is_pending()
    }

    /// The render host.
    pub fn host(&self) -> &Rc<H> {
        &self.inner.host
    }
}

// =============================================================================
// Tests
// =============================================================================
