//! Code Input Engine - Box bookkeeping.
//!
//! The engine owns the data structures behind one widget:
//! - Registry: rendered box handles and per-box state as parallel arrays
//!
//! Boxes are NOT owned by the engine. The render host creates and destroys
//! them; the registry only tracks handles and reconciles when the host's list
//! changes.

mod registry;

pub use registry::*;
