//! Per-frame composition and the cooperative frame loop state.

use crate::backend::{BufferHandle, Primitive, ProgramHandle, RenderBackend, Uniforms, VERTEX_STRIDE_FLOATS};
use crate::camera::CameraRig;
use crate::clock::Clock;
use crate::error::Result;
use crate::input::PointerInput;
use crate::transform::{ModelMode, ProjectionMode, TransformComposer};
use glam::Mat4;
use std::time::{Duration, Instant};

pub const PROJECTION_UNIFORM: &str = "projection";
pub const VIEW_UNIFORM: &str = "view";
pub const MODEL_UNIFORM: &str = "model";
pub const ELAPSED_UNIFORM: &str = "elapsed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The three matrices handed to the backend for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub projection: Mat4,
    pub view: Mat4,
    pub model: Mat4,
    pub elapsed: Duration,
}

impl FrameUniforms {
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.model
    }

    pub fn to_uniforms(&self) -> Uniforms {
        let mut uniforms = Uniforms::new();
        uniforms
            .set_matrix(PROJECTION_UNIFORM, self.projection)
            .set_matrix(VIEW_UNIFORM, self.view)
            .set_matrix(MODEL_UNIFORM, self.model)
            .set_scalar(ELAPSED_UNIFORM, self.elapsed.as_secs_f32());
        uniforms
    }
}

/// Backend resources for the single object a demo draws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scene {
    pub program: ProgramHandle,
    pub buffer: BufferHandle,
    pub primitive: Primitive,
    pub vertex_count: u32,
}

impl Scene {
    /// Compiles the program and uploads `vertices`. Compile failures are
    /// returned as-is; shader sources are static so there is nothing to retry.
    pub fn upload<B: RenderBackend>(
        backend: &mut B,
        vertices: &[f32],
        vertex_source: &str,
        fragment_source: &str,
        primitive: Primitive,
    ) -> Result<Self> {
        let program = backend.compile_program(vertex_source, fragment_source).map_err(|err| {
            log::error!("{}", err);
            err
        })?;
        let buffer = backend.create_vertex_buffer(vertices);

        Ok(Self {
            program,
            buffer,
            primitive,
            vertex_count: (vertices.len() / VERTEX_STRIDE_FLOATS) as u32,
        })
    }
}

/// Owns everything that changes between frames.
pub struct Viewer<C: CameraRig> {
    clock: Clock,
    camera: C,
    composer: TransformComposer,
    model_mode: ModelMode,
    projection_mode: ProjectionMode,
    viewport: Viewport,
    running: bool,
}

impl<C: CameraRig> Viewer<C> {
    pub fn new(camera: C, composer: TransformComposer, viewport: Viewport, start: Instant) -> Self {
        Self {
            clock: Clock::new(start),
            camera,
            composer,
            model_mode: ModelMode::Static,
            projection_mode: ProjectionMode::Perspective,
            viewport,
            running: true,
        }
    }

    pub fn with_model_mode(mut self, model_mode: ModelMode) -> Self {
        self.model_mode = model_mode;
        self
    }

    pub fn with_projection_mode(mut self, projection_mode: ProjectionMode) -> Self {
        self.projection_mode = projection_mode;
        self
    }

    pub fn handle_input(&mut self, input: PointerInput) {
        self.camera.handle_input(input);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        log::info!("viewport resized to {}x{}", width, height);
        self.viewport = Viewport::new(width, height);
    }

    /// Builds the frame matrices for a given elapsed time without touching the clock.
    pub fn compose_at(&self, elapsed: Duration) -> Result<FrameUniforms> {
        let projection =
            self.composer
                .projection_for(self.projection_mode, self.viewport.width, self.viewport.height)?;

        Ok(FrameUniforms {
            projection,
            view: self.camera.view_matrix(),
            model: self.composer.model_matrix(elapsed, self.model_mode),
            elapsed,
        })
    }

    pub fn compose(&mut self, now: Instant) -> Result<FrameUniforms> {
        let elapsed = self.clock.tick(now);
        self.compose_at(elapsed)
    }

    /// Composes and draws one frame. Returns `Ok(None)` once stopped.
    pub fn render<B: RenderBackend>(
        &mut self,
        now: Instant,
        backend: &mut B,
        scene: &Scene,
    ) -> Result<Option<FrameUniforms>> {
        if !self.running {
            return Ok(None);
        }

        let frame = self.compose(now)?;
        backend.draw(
            scene.program,
            scene.buffer,
            &frame.to_uniforms(),
            scene.primitive,
            scene.vertex_count,
        )?;
        Ok(Some(frame))
    }

    pub fn stop(&mut self) {
        if self.running {
            log::info!("frame loop stopped after {:.2}s", self.clock.elapsed().as_secs_f32());
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn camera(&self) -> &C {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn model_mode(&self) -> ModelMode {
        self.model_mode
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.projection_mode
    }
}
