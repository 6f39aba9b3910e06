//! State Module - Runtime state systems
//!
//! This module contains the systems behind the code input's interactivity:
//!
//! - **Scheduler** - Cooperative event loop, deferred tasks on a virtual clock
//! - **Completion** - Debounced code assembly
//! - **Focus** - Initial focus, auto-advance, step back
//! - **Keyboard** - Key events and deletion intent
//! - **Input** - crossterm event conversion and polling

pub mod completion;
pub mod focus;
pub mod input;
pub mod keyboard;
pub mod scheduler;

pub use completion::{COMPLETION_DEBOUNCE, Debouncer};
pub use focus::{FocusController, FocusMove};
pub use input::InputEvent;
pub use keyboard::{COMPOSITION_KEY_CODE, KeyIntent, KeyState, KeyboardEvent, Modifiers};
pub use scheduler::TaskHandle;
