//! # spark-pin
//!
//! Segmented PIN / one-time-code input for reactive terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive box values.
//!
//! ## Architecture
//!
//! The widget is headless. It keeps an ordered registry of box handles supplied
//! by a render host and turns UI events into box writes, focus moves and a
//! debounced completion callback:
//!
//! ```text
//! InputEvent → CodeInput handlers → BoxRegistry writes → FocusMove
//!                                                      → Debouncer → on_complete(code)
//! ```
//!
//! Everything runs on one thread. Deferred work (the completion debounce and the
//! composition-key caret check) goes through a cooperative scheduler that the
//! host advances.
//!
//! ## Modules
//!
//! - [`types`] - Core types (BoxId, BoxState, EventOutcome)
//! - [`engine`] - Box registry: handles and states in lockstep
//! - [`host`] - Render host traits and the in-memory headless host
//! - [`primitives`] - The `code_input` component and its props
//! - [`state`] - Scheduler, completion, focus, keyboard, crossterm input
//! - [`validation`] - Per-character validation rules
//! - [`error`] - Configuration errors

pub mod engine;
pub mod error;
pub mod host;
pub mod primitives;
pub mod state;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use types::*;

pub use engine::{apply_writes, BoxRegistry, BoxWrite, Reconciled};

pub use error::{CodeInputError, CodeInputResult};

pub use host::{BoxHandle, BoxListListener, HeadlessBox, HeadlessHost, RenderHost};

pub use primitives::{
    code_input, Cleanup, CodeInput, CodeInputProps, OnComplete, DEFAULT_MASK_CHAR,
};

pub use state::{
    // Completion
    COMPLETION_DEBOUNCE, Debouncer,
    // Focus
    FocusController, FocusMove,
    // Keyboard
    COMPOSITION_KEY_CODE, KeyIntent, KeyState, KeyboardEvent, Modifiers,
    // Input
    InputEvent,
    // Scheduler
    TaskHandle,
};

pub use validation::ValidationRule;
