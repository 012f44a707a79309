use std::fmt;

use naga::front::glsl::{Frontend, Options};
use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::source::ShaderStage;

/// Upper bound, in bytes, on a stored compile/link diagnostic.
pub const INFO_LOG_CAPACITY: usize = 512;

/// Diagnostic text from a compile or link step, truncated to
/// `INFO_LOG_CAPACITY` bytes on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoLog(String);

impl InfoLog {
    pub fn bounded(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if text.len() > INFO_LOG_CAPACITY {
            let mut end = INFO_LOG_CAPACITY;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for InfoLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of compiling one shader stage.
///
/// Mirrors a driver shader object: it exists whether or not compilation
/// succeeded, and carries a status flag plus the diagnostic log.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    pub stage: ShaderStage,
    pub compiled: bool,
    pub log: InfoLog,
    module: Option<naga::Module>,
}

impl CompiledStage {
    fn failed(stage: ShaderStage, log: impl Into<String>) -> Self {
        let mut log = InfoLog::bounded(log);
        if log.is_empty() {
            log = InfoLog::bounded(format!("{stage} shader failed to compile"));
        }
        Self {
            stage,
            compiled: false,
            log,
            module: None,
        }
    }

    /// Validated IR; `None` when compilation failed.
    pub fn module(&self) -> Option<&naga::Module> {
        self.module.as_ref()
    }
}

/// Compiles GLSL `source` for `stage`: parse, validate, and check that the
/// module has an entry point for that stage.
///
/// Never panics on bad input; failures come back as `compiled == false` with a
/// non-empty log.
pub fn compile_glsl(stage: ShaderStage, source: &str) -> CompiledStage {
    let mut frontend = Frontend::default();
    let options = Options::from(stage.to_naga());

    let module = match frontend.parse(&options, source) {
        Ok(module) => module,
        Err(errors) => return CompiledStage::failed(stage, errors.emit_to_string(source)),
    };

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    if let Err(err) = validator.validate(&module) {
        return CompiledStage::failed(stage, err.emit_to_string(source));
    }

    if !module.entry_points.iter().any(|ep| ep.stage == stage.to_naga()) {
        return CompiledStage::failed(stage, format!("no {stage} entry point in module"));
    }

    CompiledStage {
        stage,
        compiled: true,
        log: InfoLog::default(),
        module: Some(module),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::ShaderSources;

    // ── compile ───────────────────────────────────────────────────────────

    #[test]
    fn builtin_vertex_compiles() {
        let src = ShaderSources::builtin();
        let out = compile_glsl(ShaderStage::Vertex, &src.vertex);
        assert!(out.compiled, "log: {}", out.log);
        assert!(out.log.is_empty());
        assert!(out.module().is_some());
    }

    #[test]
    fn builtin_fragment_compiles() {
        let src = ShaderSources::builtin();
        let out = compile_glsl(ShaderStage::Fragment, &src.fragment);
        assert!(out.compiled, "log: {}", out.log);
    }

    #[test]
    fn syntax_error_reports_diagnostic() {
        let src = "#version 450 core\nvoid main() { gl_Position = vec4(1.0; }\n";
        let out = compile_glsl(ShaderStage::Vertex, src);
        assert!(!out.compiled);
        assert!(!out.log.is_empty());
        assert!(out.module().is_none());
    }

    #[test]
    fn undeclared_identifier_fails() {
        let src = "#version 450 core\nvoid main() { gl_Position = vec4(missing, 1.0); }\n";
        let out = compile_glsl(ShaderStage::Vertex, src);
        assert!(!out.compiled);
        assert!(!out.log.is_empty());
    }

    #[test]
    fn empty_source_fails() {
        let out = compile_glsl(ShaderStage::Fragment, "");
        assert!(!out.compiled);
        assert!(!out.log.is_empty());
    }

    // ── info log ──────────────────────────────────────────────────────────

    #[test]
    fn info_log_is_bounded() {
        let log = InfoLog::bounded("x".repeat(INFO_LOG_CAPACITY * 3));
        assert_eq!(log.as_str().len(), INFO_LOG_CAPACITY);
    }

    #[test]
    fn info_log_truncates_on_char_boundary() {
        // 'é' is two bytes; 511 ASCII bytes + 'é' straddles the limit.
        let text = format!("{}é", "a".repeat(INFO_LOG_CAPACITY - 1));
        let log = InfoLog::bounded(text);
        assert_eq!(log.as_str().len(), INFO_LOG_CAPACITY - 1);
    }

    #[test]
    fn short_log_is_kept() {
        assert_eq!(InfoLog::bounded("oops").as_str(), "oops");
    }
}
