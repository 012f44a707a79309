use std::fmt;

/// Programmable pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// GLSL source text for the two stages of the triangle program.
///
/// Sources are injected through `RendererConfig`; `builtin()` is only the
/// default the application ships with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }

    /// Pass-through position vertex stage and a solid orange fragment stage.
    pub fn builtin() -> Self {
        Self::new(
            include_str!("glsl/triangle.vert"),
            include_str!("glsl/triangle.frag"),
        )
    }
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::builtin()
    }
}
