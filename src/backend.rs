//! Boundary with the GPU drawing backend.
//!
//! Backends own every GPU resource. The core only ever sees opaque handles
//! and hands over per-draw uniforms.

use crate::error::{CompileError, Result, ShaderStage, ViewerError};
use glam::Mat4;
use std::collections::BTreeMap;

/// Floats per vertex: position (xyz) followed by color (rgb).
pub const VERTEX_STRIDE_FLOATS: usize = 6;
pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles,
    Lines,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Matrix(Mat4),
    Scalar(f32),
}

/// Uniform values for one draw, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uniforms {
    values: BTreeMap<String, UniformValue>,
}

impl Uniforms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_matrix(&mut self, name: &str, matrix: Mat4) -> &mut Self {
        self.values.insert(name.to_owned(), UniformValue::Matrix(matrix));
        self
    }

    pub fn set_scalar(&mut self, name: &str, value: f32) -> &mut Self {
        self.values.insert(name.to_owned(), UniformValue::Scalar(value));
        self
    }

    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    /// First matrix found under any of `names`.
    pub fn matrix(&self, names: &[&str]) -> Option<Mat4> {
        names.iter().find_map(|name| match self.values.get(*name) {
            Some(UniformValue::Matrix(matrix)) => Some(*matrix),
            _ => None,
        })
    }

    pub fn scalar(&self, name: &str) -> Option<f32> {
        match self.values.get(name) {
            Some(UniformValue::Scalar(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

pub trait RenderBackend {
    /// Uploads interleaved vertex data laid out per [`VERTEX_STRIDE_FLOATS`].
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle;

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> std::result::Result<ProgramHandle, CompileError>;

    fn draw(
        &mut self,
        program: ProgramHandle,
        buffer: BufferHandle,
        uniforms: &Uniforms,
        primitive: Primitive,
        vertex_count: u32,
    ) -> Result<()>;
}

/// Fails when a draw asks for more vertices than the buffer holds.
pub fn check_vertex_count(vertex_count: u32, available: u32) -> Result<()> {
    if vertex_count > available {
        return Err(ViewerError::Backend(format!(
            "draw of {} vertices exceeds buffer holding {}",
            vertex_count, available
        )));
    }
    Ok(())
}

/// A draw call as captured by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub program: ProgramHandle,
    pub buffer: BufferHandle,
    pub uniforms: Uniforms,
    pub primitive: Primitive,
    pub vertex_count: u32,
}

/// Headless backend that keeps uploads in memory and logs every draw.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    buffers: Vec<Vec<f32>>,
    programs: Vec<(String, String)>,
    draws: Vec<RecordedDraw>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self, handle: BufferHandle) -> Option<&[f32]> {
        self.buffers.get(handle.0 as usize).map(Vec::as_slice)
    }

    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn last_draw(&self) -> Option<&RecordedDraw> {
        self.draws.last()
    }

    fn check_source(source: &str, stage: ShaderStage, entry_point: &str) -> std::result::Result<(), CompileError> {
        if source.trim().is_empty() {
            return Err(CompileError::new(stage, "empty shader source"));
        }
        if !source.contains(entry_point) {
            return Err(CompileError::new(stage, format!("missing entry point `{}`", entry_point)));
        }
        Ok(())
    }
}

impl RenderBackend for RecordingBackend {
    fn create_vertex_buffer(&mut self, data: &[f32]) -> BufferHandle {
        let handle = BufferHandle(self.buffers.len() as u32);
        self.buffers.push(data.to_vec());
        handle
    }

    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> std::result::Result<ProgramHandle, CompileError> {
        Self::check_source(vertex_source, ShaderStage::Vertex, VERTEX_ENTRY_POINT)?;
        Self::check_source(fragment_source, ShaderStage::Fragment, FRAGMENT_ENTRY_POINT)?;

        let handle = ProgramHandle(self.programs.len() as u32);
        self.programs.push((vertex_source.to_owned(), fragment_source.to_owned()));
        Ok(handle)
    }

    fn draw(
        &mut self,
        program: ProgramHandle,
        buffer: BufferHandle,
        uniforms: &Uniforms,
        primitive: Primitive,
        vertex_count: u32,
    ) -> Result<()> {
        if program.0 as usize >= self.programs.len() {
            return Err(ViewerError::Backend(format!("unknown program {:?}", program)));
        }
        let Some(data) = self.buffers.get(buffer.0 as usize) else {
            return Err(ViewerError::Backend(format!("unknown buffer {:?}", buffer)));
        };

        check_vertex_count(vertex_count, (data.len() / VERTEX_STRIDE_FLOATS) as u32)?;

        self.draws.push(RecordedDraw {
            program,
            buffer,
            uniforms: uniforms.clone(),
            primitive,
            vertex_count,
        });
        Ok(())
    }
}
