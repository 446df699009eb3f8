use glam::Mat4;
use orbit_viewer::backend::{
    check_vertex_count, BufferHandle, Primitive, ProgramHandle, RecordingBackend, RenderBackend, UniformValue, Uniforms,
};
use orbit_viewer::error::ShaderStage;
use orbit_viewer::shaders::{COLOR_FRAGMENT_SHADER, TRANSFORM_VERTEX_SHADER};
use orbit_viewer::{Scene, ViewerError};

const LINE: [f32; 12] = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];

#[test]
fn test_buffers_keep_uploaded_data() {
    let mut backend = RecordingBackend::new();
    let first = backend.create_vertex_buffer(&LINE);
    let second = backend.create_vertex_buffer(&LINE[..6]);

    assert_ne!(first, second);
    assert_eq!(backend.buffer(first), Some(&LINE[..]));
    assert_eq!(backend.buffer(second).map(<[f32]>::len), Some(6));
    assert_eq!(backend.buffer(BufferHandle(7)), None);
}

#[test]
fn test_compile_rejects_empty_vertex_source() {
    let mut backend = RecordingBackend::new();
    let err = backend.compile_program("   ", COLOR_FRAGMENT_SHADER).unwrap_err();

    assert_eq!(err.stage, ShaderStage::Vertex);
    assert_eq!(backend.program_count(), 0);
}

#[test]
fn test_compile_rejects_missing_fragment_entry_point() {
    let mut backend = RecordingBackend::new();
    let err = backend
        .compile_program(TRANSFORM_VERTEX_SHADER, "@fragment fn main() {}")
        .unwrap_err();

    assert_eq!(err.stage, ShaderStage::Fragment);
    assert!(err.message.contains("fs_main"));
}

#[test]
fn test_scene_upload_propagates_compile_error() {
    let mut backend = RecordingBackend::new();
    let result = Scene::upload(&mut backend, &LINE, "", COLOR_FRAGMENT_SHADER, Primitive::Lines);

    assert!(matches!(result, Err(ViewerError::Compile(_))));
}

#[test]
fn test_scene_upload_counts_vertices() {
    let mut backend = RecordingBackend::new();
    let scene = Scene::upload(
        &mut backend,
        &LINE,
        TRANSFORM_VERTEX_SHADER,
        COLOR_FRAGMENT_SHADER,
        Primitive::Lines,
    )
    .unwrap();

    assert_eq!(scene.vertex_count, 2);
    assert_eq!(scene.primitive, Primitive::Lines);
    assert_eq!(backend.program_count(), 1);
}

#[test]
fn test_draw_rejects_unknown_handles() {
    let mut backend = RecordingBackend::new();
    let buffer = backend.create_vertex_buffer(&LINE);
    let program = backend
        .compile_program(TRANSFORM_VERTEX_SHADER, COLOR_FRAGMENT_SHADER)
        .unwrap();
    let uniforms = Uniforms::new();

    let bad_program = backend.draw(ProgramHandle(3), buffer, &uniforms, Primitive::Lines, 2);
    assert!(matches!(bad_program, Err(ViewerError::Backend(_))));

    let bad_buffer = backend.draw(program, BufferHandle(3), &uniforms, Primitive::Lines, 2);
    assert!(matches!(bad_buffer, Err(ViewerError::Backend(_))));

    assert!(backend.draws().is_empty());
}

#[test]
fn test_draw_rejects_overlong_vertex_count() {
    let mut backend = RecordingBackend::new();
    let buffer = backend.create_vertex_buffer(&LINE);
    let program = backend
        .compile_program(TRANSFORM_VERTEX_SHADER, COLOR_FRAGMENT_SHADER)
        .unwrap();

    let result = backend.draw(program, buffer, &Uniforms::new(), Primitive::Lines, 3);
    assert!(matches!(result, Err(ViewerError::Backend(_))));
    assert!(backend.draws().is_empty());
}

#[test]
fn test_vertex_count_check_shared_by_backends() {
    assert!(check_vertex_count(0, 0).is_ok());
    assert!(check_vertex_count(36, 36).is_ok());

    let Err(ViewerError::Backend(message)) = check_vertex_count(37, 36) else {
        panic!("overlong draw should be rejected");
    };
    assert!(message.contains("37") && message.contains("36"));
}

#[test]
fn test_uniform_lookup_by_alias() {
    let scale = Mat4::from_scale(glam::Vec3::splat(2.0));
    let mut uniforms = Uniforms::new();
    uniforms.set_matrix("proj", scale).set_scalar("elapsed", 1.5);

    assert_eq!(uniforms.len(), 2);
    assert_eq!(uniforms.matrix(&["projection", "proj"]), Some(scale));
    assert_eq!(uniforms.matrix(&["view"]), None);
    // Scalars are not returned as matrices and vice versa.
    assert_eq!(uniforms.matrix(&["elapsed"]), None);
    assert_eq!(uniforms.scalar("proj"), None);
    assert_eq!(uniforms.get("elapsed"), Some(UniformValue::Scalar(1.5)));
}
