//! Error types surfaced by the transform pipeline and its backends.

use std::fmt;

/// Shader compile or link failure reported by a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub stage: ShaderStage,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Link,
}

impl CompileError {
    pub fn new(stage: ShaderStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Link => "link",
        };
        f.write_str(name)
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shader failed to compile: {}", self.stage, self.message)
    }
}

impl std::error::Error for CompileError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// Projection requested for a viewport with no area.
    InvalidViewport { width: u32, height: u32 },
    Compile(CompileError),
    /// Orbit parameters outside their clamped ranges. Indicates a logic bug
    /// upstream (or invalid settings), never a recoverable runtime condition.
    OutOfRangeOrbit { pitch: f32, radius: f32 },
    /// Draw submission rejected by the backend.
    Backend(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::InvalidViewport { width, height } => {
                write!(f, "invalid viewport {}x{}: width and height must be non-zero", width, height)
            }
            ViewerError::Compile(err) => write!(f, "{}", err),
            ViewerError::OutOfRangeOrbit { pitch, radius } => {
                write!(f, "orbit out of range (pitch {}, radius {})", pitch, radius)
            }
            ViewerError::Backend(message) => write!(f, "backend error: {}", message),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Compile(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CompileError> for ViewerError {
    fn from(err: CompileError) -> Self {
        ViewerError::Compile(err)
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
