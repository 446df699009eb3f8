//! Projection and model matrix construction.

use crate::error::{Result, ViewerError};
use glam::{Mat4, Vec3};
use std::time::Duration;

pub const DEFAULT_FOV_DEGREES: f32 = 60.0;
pub const NEAR_PLANE: f32 = 0.001;
pub const FAR_PLANE: f32 = 1000.0;
pub const PIXEL_NEAR_PLANE: f32 = -100.0;
pub const PIXEL_FAR_PLANE: f32 = 100.0;

/// Clip-space depth range expected by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthRange {
    /// OpenGL / WebGL style, z in [-1, 1].
    NegativeOneToOne,
    /// wgpu / Vulkan / Metal style, z in [0, 1].
    #[default]
    ZeroToOne,
}

/// Per-demo model transform. Every mode is a pure function of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ModelMode {
    #[default]
    Static,
    RotateY { degrees_per_second: f32 },
    /// In-plane spin, for flat demos drawn facing the viewer.
    RotateZ { degrees_per_second: f32 },
    TranslateZ { offset: f32 },
    /// Traces a circle in the XY plane starting at (0, radius).
    Circle { radius: f32, radians_per_second: f32 },
}

/// How the projection slot is filled for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    /// Screen-pixel coordinates with the origin at the top-left corner.
    PixelOrtho { near: f32, far: f32 },
    /// Geometry already in normalized device coordinates.
    ClipSpace,
}

impl ProjectionMode {
    pub fn pixel() -> Self {
        ProjectionMode::PixelOrtho {
            near: PIXEL_NEAR_PLANE,
            far: PIXEL_FAR_PLANE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSettings {
    pub fov_radians: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub depth_range: DepthRange,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            fov_radians: DEFAULT_FOV_DEGREES.to_radians(),
            near_plane: NEAR_PLANE,
            far_plane: FAR_PLANE,
            depth_range: DepthRange::default(),
        }
    }
}

/// Builds the projection and model matrices for a frame.
///
/// Holds only session constants. Aspect ratio is derived from the viewport
/// on every call so resizes take effect on the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransformComposer {
    settings: ProjectionSettings,
}

impl TransformComposer {
    pub fn new(settings: ProjectionSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ProjectionSettings {
        &self.settings
    }

    pub fn projection_matrix(&self, viewport_width: u32, viewport_height: u32) -> Result<Mat4> {
        let aspect_ratio = aspect_ratio(viewport_width, viewport_height)?;
        let ProjectionSettings {
            fov_radians,
            near_plane,
            far_plane,
            depth_range,
        } = self.settings;

        Ok(match depth_range {
            DepthRange::ZeroToOne => Mat4::perspective_rh(fov_radians, aspect_ratio, near_plane, far_plane),
            DepthRange::NegativeOneToOne => {
                Mat4::perspective_rh_gl(fov_radians, aspect_ratio, near_plane, far_plane)
            }
        })
    }

    pub fn ortho_projection(&self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        match self.settings.depth_range {
            DepthRange::ZeroToOne => Mat4::orthographic_rh(left, right, bottom, top, near, far),
            DepthRange::NegativeOneToOne => Mat4::orthographic_rh_gl(left, right, bottom, top, near, far),
        }
    }

    /// Resolves the projection slot for `mode` at the given viewport size.
    pub fn projection_for(&self, mode: ProjectionMode, viewport_width: u32, viewport_height: u32) -> Result<Mat4> {
        match mode {
            ProjectionMode::Perspective => self.projection_matrix(viewport_width, viewport_height),
            ProjectionMode::PixelOrtho { near, far } => {
                aspect_ratio(viewport_width, viewport_height)?;
                Ok(self.ortho_projection(0.0, viewport_width as f32, viewport_height as f32, 0.0, near, far))
            }
            ProjectionMode::ClipSpace => Ok(Mat4::IDENTITY),
        }
    }

    pub fn model_matrix(&self, elapsed: Duration, mode: ModelMode) -> Mat4 {
        let seconds = elapsed.as_secs_f32();
        match mode {
            ModelMode::Static => Mat4::IDENTITY,
            ModelMode::RotateY { degrees_per_second } => {
                Mat4::from_rotation_y((seconds * degrees_per_second).to_radians())
            }
            ModelMode::RotateZ { degrees_per_second } => {
                Mat4::from_rotation_z((seconds * degrees_per_second).to_radians())
            }
            ModelMode::TranslateZ { offset } => Mat4::from_translation(Vec3::new(0.0, 0.0, offset)),
            ModelMode::Circle {
                radius,
                radians_per_second,
            } => {
                let angle = seconds * radians_per_second;
                Mat4::from_translation(Vec3::new(radius * angle.sin(), radius * angle.cos(), 0.0))
            }
        }
    }
}

fn aspect_ratio(viewport_width: u32, viewport_height: u32) -> Result<f32> {
    if viewport_width == 0 || viewport_height == 0 {
        return Err(ViewerError::InvalidViewport {
            width: viewport_width,
            height: viewport_height,
        });
    }
    Ok(viewport_width as f32 / viewport_height as f32)
}
