//! CPU-side transform and camera pipeline for small GPU demos.
//!
//! Per frame the [`clock::Clock`] advances, the [`transform::TransformComposer`]
//! builds projection and model matrices, and a [`camera::CameraRig`] supplies
//! the view. The resulting [`viewer::FrameUniforms`] are handed to a
//! [`backend::RenderBackend`] for a single draw.

pub mod backend;
pub mod camera;
pub mod clock;
pub mod demos;
pub mod error;
pub mod gpu;
pub mod input;
pub mod shaders;
pub mod transform;
pub mod viewer;
pub mod wgpu_backend;

pub use backend::{RecordingBackend, RenderBackend};
pub use camera::{CameraRig, FixedCamera, OrbitCamera, OrbitSettings};
pub use clock::Clock;
pub use error::{CompileError, ViewerError};
pub use input::PointerInput;
pub use transform::{ModelMode, ProjectionMode, TransformComposer};
pub use viewer::{FrameUniforms, Scene, Viewer, Viewport};
