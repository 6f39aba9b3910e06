//! Primitives - Component building blocks.
//!
//! - [`code_input`] - Segmented PIN / one-time-code entry
//!
//! # Architecture
//!
//! A component is mounted on a [`RenderHost`](crate::host::RenderHost) and:
//! 1. Subscribes to the host's box list changes
//! 2. Requests a render for its configured length
//! 3. Reconciles its registry against whatever was rendered
//! 4. Returns a handle whose drop (or `unmount`) releases the subscription
//!
//! Props are plain structs with a `Default` impl:
//!
//! ```ignore
//! let pin = code_input(host, CodeInputProps {
//!     code_length: 6,
//!     secret: true,
//!     ..Default::default()
//! })?;
//! ```

mod code_input;
mod types;

pub use code_input::{code_input, CodeInput};
pub use types::*;
