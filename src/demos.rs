//! Built-in demo scenes.
//!
//! Each demo is one vertex list, one primitive, and a choice of camera,
//! projection and model animation.

use crate::backend::Primitive;
use crate::camera::{CameraRig, FixedCamera, OrbitCamera, OrbitSettings};
use crate::error::Result;
use crate::input::PointerInput;
use crate::shaders::{COLOR_FRAGMENT_SHADER, SPIN_VERTEX_SHADER, TRANSFORM_VERTEX_SHADER};
use crate::transform::{DepthRange, ModelMode, ProjectionMode, ProjectionSettings, TransformComposer};
use crate::viewer::{Viewer, Viewport};
use glam::{Mat4, Vec3};
use std::time::Instant;

const WHITE: [f32; 3] = [1.0, 1.0, 1.0];
const RED: [f32; 3] = [1.0, 0.0, 0.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const BLUE: [f32; 3] = [0.0, 0.0, 1.0];

const TRIANGLE_SPIN_DEGREES_PER_SECOND: f32 = 30.0;
// One radian per second.
const CUBE_SPIN_DEGREES_PER_SECOND: f32 = 57.295_78;
const WIREFRAME_FOV_DEGREES: f32 = 60.0;
const WIREFRAME_NEAR_PLANE: f32 = 0.01;
const WIREFRAME_FAR_PLANE: f32 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DemoKind {
    /// Line-drawn tetrahedron seen from a fixed eye.
    WireTetrahedron,
    /// Triangle spinning in the screen plane.
    SpinningTriangle,
    /// Red/green/blue triangle spun by the vertex shader from elapsed time.
    ShaderSpinTriangle,
    /// Triangle sliding around a circle.
    SlidingTriangle,
    /// Triangle placed in window pixel coordinates.
    PixelTriangle,
    /// Colored cube under a draggable orbit camera.
    OrbitCube,
    /// Orbit cube that also spins about Y.
    SpinningCube,
}

/// Camera used by a demo; lets one viewer type host every demo.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoCamera {
    Orbit(OrbitCamera),
    Fixed(FixedCamera),
}

impl CameraRig for DemoCamera {
    fn eye_position(&self) -> Vec3 {
        match self {
            DemoCamera::Orbit(camera) => camera.eye_position(),
            DemoCamera::Fixed(camera) => camera.eye_position(),
        }
    }

    fn target(&self) -> Vec3 {
        match self {
            DemoCamera::Orbit(camera) => camera.target(),
            DemoCamera::Fixed(camera) => camera.target(),
        }
    }

    fn up_vector(&self) -> Vec3 {
        match self {
            DemoCamera::Orbit(camera) => camera.up_vector(),
            DemoCamera::Fixed(camera) => camera.up_vector(),
        }
    }

    fn view_matrix(&self) -> Mat4 {
        match self {
            DemoCamera::Orbit(camera) => camera.view_matrix(),
            DemoCamera::Fixed(camera) => camera.view_matrix(),
        }
    }

    fn handle_input(&mut self, input: PointerInput) {
        match self {
            DemoCamera::Orbit(camera) => camera.handle_input(input),
            DemoCamera::Fixed(camera) => camera.handle_input(input),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Demo {
    pub kind: DemoKind,
    pub vertices: Vec<f32>,
    pub primitive: Primitive,
    pub model_mode: ModelMode,
    pub projection_mode: ProjectionMode,
    pub projection: ProjectionSettings,
    pub camera: DemoCamera,
    pub vertex_shader: &'static str,
    pub fragment_shader: &'static str,
}

impl Demo {
    pub fn new(kind: DemoKind) -> Result<Self> {
        let demo = match kind {
            DemoKind::WireTetrahedron => Self {
                kind,
                vertices: tetrahedron_edges(),
                primitive: Primitive::Lines,
                model_mode: ModelMode::TranslateZ { offset: -1.0 / 3.0 },
                projection_mode: ProjectionMode::Perspective,
                projection: ProjectionSettings {
                    fov_radians: WIREFRAME_FOV_DEGREES.to_radians(),
                    near_plane: WIREFRAME_NEAR_PLANE,
                    far_plane: WIREFRAME_FAR_PLANE,
                    ..ProjectionSettings::default()
                },
                camera: DemoCamera::Fixed(FixedCamera::looking_at(
                    Vec3::new(2.0, 4.0, 4.0),
                    Vec3::ZERO,
                    Vec3::Y,
                )),
                vertex_shader: TRANSFORM_VERTEX_SHADER,
                fragment_shader: COLOR_FRAGMENT_SHADER,
            },
            DemoKind::SpinningTriangle => Self::clip_space_triangle(
                kind,
                ModelMode::RotateZ {
                    degrees_per_second: TRIANGLE_SPIN_DEGREES_PER_SECOND,
                },
            ),
            DemoKind::ShaderSpinTriangle => Self {
                vertices: rgb_triangle(),
                vertex_shader: SPIN_VERTEX_SHADER,
                ..Self::clip_space_triangle(kind, ModelMode::Static)
            },
            DemoKind::SlidingTriangle => Self::clip_space_triangle(
                kind,
                ModelMode::Circle {
                    radius: 1.0,
                    radians_per_second: 1.0,
                },
            ),
            DemoKind::PixelTriangle => Self {
                kind,
                vertices: pixel_triangle(),
                primitive: Primitive::Triangles,
                model_mode: ModelMode::Static,
                projection_mode: ProjectionMode::pixel(),
                projection: ProjectionSettings::default(),
                camera: DemoCamera::Fixed(FixedCamera::clip_space()),
                vertex_shader: TRANSFORM_VERTEX_SHADER,
                fragment_shader: COLOR_FRAGMENT_SHADER,
            },
            DemoKind::OrbitCube => Self::orbit_cube(kind, ModelMode::Static)?,
            DemoKind::SpinningCube => Self::orbit_cube(
                kind,
                ModelMode::RotateY {
                    degrees_per_second: CUBE_SPIN_DEGREES_PER_SECOND,
                },
            )?,
        };
        Ok(demo)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / crate::backend::VERTEX_STRIDE_FLOATS
    }

    /// Builds the viewer for this demo with the backend's depth convention.
    pub fn viewer(&self, viewport: Viewport, start: Instant, depth_range: DepthRange) -> Viewer<DemoCamera> {
        let composer = TransformComposer::new(ProjectionSettings {
            depth_range,
            ..self.projection
        });
        Viewer::new(self.camera.clone(), composer, viewport, start)
            .with_model_mode(self.model_mode)
            .with_projection_mode(self.projection_mode)
    }

    fn clip_space_triangle(kind: DemoKind, model_mode: ModelMode) -> Self {
        Self {
            kind,
            vertices: clip_space_triangle(),
            primitive: Primitive::Triangles,
            model_mode,
            projection_mode: ProjectionMode::ClipSpace,
            projection: ProjectionSettings::default(),
            camera: DemoCamera::Fixed(FixedCamera::clip_space()),
            vertex_shader: TRANSFORM_VERTEX_SHADER,
            fragment_shader: COLOR_FRAGMENT_SHADER,
        }
    }

    fn orbit_cube(kind: DemoKind, model_mode: ModelMode) -> Result<Self> {
        Ok(Self {
            kind,
            vertices: colored_cube(),
            primitive: Primitive::Triangles,
            model_mode,
            projection_mode: ProjectionMode::Perspective,
            projection: ProjectionSettings::default(),
            camera: DemoCamera::Orbit(OrbitCamera::new(OrbitSettings::default())?),
            vertex_shader: TRANSFORM_VERTEX_SHADER,
            fragment_shader: COLOR_FRAGMENT_SHADER,
        })
    }
}

fn push_vertex(vertices: &mut Vec<f32>, position: [f32; 3], color: [f32; 3]) {
    vertices.extend_from_slice(&position);
    vertices.extend_from_slice(&color);
}

fn clip_space_triangle() -> Vec<f32> {
    let mut vertices = Vec::with_capacity(18);
    for position in [[-0.5, -0.5, 0.0], [0.5, -0.5, 0.0], [0.0, 0.5, 0.0]] {
        push_vertex(&mut vertices, position, WHITE);
    }
    vertices
}

fn rgb_triangle() -> Vec<f32> {
    let mut vertices = Vec::with_capacity(18);
    for (position, color) in [
        ([-0.5, -0.5, 0.0], RED),
        ([0.5, -0.5, 0.0], GREEN),
        ([0.0, 0.5, 0.0], BLUE),
    ] {
        push_vertex(&mut vertices, position, color);
    }
    vertices
}

fn pixel_triangle() -> Vec<f32> {
    let mut vertices = Vec::with_capacity(18);
    for position in [[400.0, 200.0, -2.0], [300.0, 300.0, -2.0], [500.0, 300.0, -2.0]] {
        push_vertex(&mut vertices, position, WHITE);
    }
    vertices
}

/// Regular tetrahedron resting on the XZ plane, as line segment pairs.
fn tetrahedron_edges() -> Vec<f32> {
    let half_side = (1.0_f32 / 3.0).sqrt();
    let apex_height = ((2.0 * half_side).powi(2) - (2.0_f32 / 3.0).powi(2)).sqrt();

    let front = [0.0, 0.0, 1.0];
    let right = [half_side, 0.0, 0.0];
    let left = [-half_side, 0.0, 0.0];
    let apex = [0.0, apex_height, 1.0 / 3.0];

    let faces = [
        [front, right, left],
        [front, apex, left],
        [front, left, apex],
        [left, apex, right],
    ];

    let mut vertices = Vec::with_capacity(faces.len() * 6 * 6);
    for [a, b, c] in faces {
        for (start, end) in [(a, b), (b, c), (c, a)] {
            push_vertex(&mut vertices, start, WHITE);
            push_vertex(&mut vertices, end, WHITE);
        }
    }
    vertices
}

/// Unit cube centered on the origin; each axis pair of faces gets one color.
fn colored_cube() -> Vec<f32> {
    let mut vertices = Vec::with_capacity(36 * 6);
    for (axis, color) in [(0, RED), (1, GREEN), (2, BLUE)] {
        for side in [0.5_f32, -0.5] {
            for (u, v) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (0.5, 0.5), (-0.5, 0.5), (-0.5, -0.5)] {
                let mut position = [0.0_f32; 3];
                position[axis] = side;
                position[(axis + 1) % 3] = u;
                position[(axis + 2) % 3] = v;
                push_vertex(&mut vertices, position, color);
            }
        }
    }
    vertices
}
