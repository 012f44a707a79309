//! Window host and runtime loop.
//!
//! `Host` holds the platform-independent window state; `Runtime` owns the
//! winit event loop, the window and the renderer bound to it.

mod error;
mod host;
mod runtime;

pub use error::HostError;
pub use host::Host;
pub use runtime::{Runtime, RuntimeConfig};
