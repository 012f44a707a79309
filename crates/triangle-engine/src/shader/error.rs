use std::fmt;

use super::compile::InfoLog;
use super::source::ShaderStage;

/// Which step of program construction failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderErrorKind {
    Compile(ShaderStage),
    Link,
}

/// A shader compile or link failure together with its diagnostic log.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderError {
    pub kind: ShaderErrorKind,
    pub log: InfoLog,
}

impl ShaderError {
    pub(crate) fn compile(stage: ShaderStage, log: InfoLog) -> Self {
        Self { kind: ShaderErrorKind::Compile(stage), log }
    }

    pub(crate) fn link(log: InfoLog) -> Self {
        Self { kind: ShaderErrorKind::Link, log }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ShaderErrorKind::Compile(stage) => {
                write!(f, "{stage} shader compilation failed:\n{}", self.log)
            }
            ShaderErrorKind::Link => write!(f, "shader program linking failed:\n{}", self.log),
        }
    }
}

impl std::error::Error for ShaderError {}
