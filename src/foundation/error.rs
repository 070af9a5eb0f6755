/// Convenience result type used across the engine.
pub type FoldResult<T> = Result<T, FoldError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Every variant is fatal to the transition being rendered; callers never receive a partial
/// frame list.
#[derive(thiserror::Error, Debug)]
pub enum FoldError {
    /// Invalid user-provided descriptor or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Degenerate mesh bounds, segment counts or fold regions.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Failure to acquire a render context or one of its resources.
    #[error("gpu context error: {0}")]
    GpuContext(String),

    /// Shader module or pipeline creation was rejected by the driver.
    #[error("shader compile error: {0}")]
    ShaderCompile(String),

    /// A draw pass or readback failed while producing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Failures while handing frames to an encoder.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FoldError {
    /// Build a [`FoldError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FoldError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`FoldError::GpuContext`] value.
    pub fn gpu_context(msg: impl Into<String>) -> Self {
        Self::GpuContext(msg.into())
    }

    /// Build a [`FoldError::ShaderCompile`] value.
    pub fn shader_compile(msg: impl Into<String>) -> Self {
        Self::ShaderCompile(msg.into())
    }

    /// Build a [`FoldError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FoldError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
