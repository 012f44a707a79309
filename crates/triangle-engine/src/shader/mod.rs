//! Shader compilation and program linking.
//!
//! GLSL is parsed and validated with naga; linking checks the interface
//! between the two stages and the vertex layout before any GPU object is made.
//! Backends turn the validated modules into GPU shader objects.

mod compile;
mod error;
mod link;
mod policy;
mod source;

pub use compile::{compile_glsl, CompiledStage, InfoLog, INFO_LOG_CAPACITY};
pub use error::{ShaderError, ShaderErrorKind};
pub use link::link_stages;
pub use policy::ShaderFailurePolicy;
pub use source::{ShaderSources, ShaderStage};
