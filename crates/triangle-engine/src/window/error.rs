use std::fmt;

use winit::error::{EventLoopError, OsError};

/// Fatal failures while bringing up the window and graphics context.
#[derive(Debug)]
pub enum HostError {
    /// The platform event loop could not be created or exited abnormally.
    EventLoop(EventLoopError),
    /// The OS refused to create the window.
    WindowCreation(OsError),
    /// No usable GPU adapter, device or surface.
    ContextCreation(anyhow::Error),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::EventLoop(e) => write!(f, "event loop error: {e}"),
            HostError::WindowCreation(e) => write!(f, "failed to create window: {e}"),
            HostError::ContextCreation(e) => write!(f, "failed to create graphics context: {e:#}"),
        }
    }
}

impl std::error::Error for HostError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HostError::EventLoop(e) => Some(e),
            HostError::WindowCreation(e) => Some(e),
            HostError::ContextCreation(e) => Some(&**e),
        }
    }
}

impl From<EventLoopError> for HostError {
    fn from(e: EventLoopError) -> Self {
        HostError::EventLoop(e)
    }
}

impl From<OsError> for HostError {
    fn from(e: OsError) -> Self {
        HostError::WindowCreation(e)
    }
}
