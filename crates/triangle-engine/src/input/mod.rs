//! Input subsystem.
//!
//! Public API is platform-agnostic and does not expose winit types.
//! Runtime code translates platform events into `InputEvent`s; the frame loop
//! queries key state through `KeyQuery` and maps it to actions via
//! `KeyBindings`.

mod bindings;
pub mod platform;
mod state;
mod types;

pub use bindings::{process_input, Action, KeyBindings};
pub use state::{InputState, KeyQuery};
pub use types::{InputEvent, Key, KeyState};
