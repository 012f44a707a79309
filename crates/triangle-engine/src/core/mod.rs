//! The per-frame control flow shared by the runtime and tests.
//!
//! Independent of winit: the runtime calls `run_iteration` once per redraw.

mod frame_loop;

pub use frame_loop::{run_iteration, LoopControl};
