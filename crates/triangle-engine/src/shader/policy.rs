/// What the renderer does when a shader fails to compile or link.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ShaderFailurePolicy {
    /// Log the diagnostic and keep running with an invalid program; frames are
    /// cleared and presented but nothing is drawn.
    #[default]
    LogAndContinue,

    /// Return the failure as a `ShaderError`, which ends the program.
    FailFast,
}
