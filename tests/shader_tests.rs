use orbit_viewer::shaders::{COLOR_FRAGMENT_SHADER, SPIN_VERTEX_SHADER, TRANSFORM_VERTEX_SHADER};

#[test]
fn test_vertex_shader_entry_point_and_inputs() {
    assert!(TRANSFORM_VERTEX_SHADER.contains("@vertex"), "Shader should contain vertex entry point");
    assert!(TRANSFORM_VERTEX_SHADER.contains("fn vs_main"), "Shader should have vs_main function");
    assert!(TRANSFORM_VERTEX_SHADER.contains("@location(0) position: vec3<f32>"));
    assert!(TRANSFORM_VERTEX_SHADER.contains("@location(1) color: vec3<f32>"));
    assert!(TRANSFORM_VERTEX_SHADER.contains("@group(0) @binding(0)"), "Shader should have binding 0");
}

#[test]
fn test_vertex_shader_composes_in_order() {
    assert!(
        TRANSFORM_VERTEX_SHADER
            .contains("transform.projection * transform.view * transform.model * vec4<f32>(input.position, 1.0)"),
        "Vertex shader should apply projection * view * model"
    );
}

#[test]
fn test_uniform_block_field_order() {
    let projection = TRANSFORM_VERTEX_SHADER.find("projection: mat4x4<f32>").unwrap();
    let view = TRANSFORM_VERTEX_SHADER.find("view: mat4x4<f32>").unwrap();
    let model = TRANSFORM_VERTEX_SHADER.find("model: mat4x4<f32>").unwrap();
    let elapsed = TRANSFORM_VERTEX_SHADER.find("elapsed: f32").unwrap();

    assert!(projection < view && view < model && model < elapsed);
}

#[test]
fn test_fragment_shader_color_passthrough() {
    assert!(COLOR_FRAGMENT_SHADER.contains("@fragment"), "Shader should contain fragment entry point");
    assert!(COLOR_FRAGMENT_SHADER.contains("fn fs_main"), "Shader should have fs_main function");
    assert!(
        COLOR_FRAGMENT_SHADER.contains("return vec4<f32>(input.color, 1.0)"),
        "Fragment shader should output color with alpha"
    );
}

#[test]
fn test_spin_shader_reads_elapsed_time() {
    assert!(SPIN_VERTEX_SHADER.contains("fn vs_main"), "Shader should have vs_main function");
    assert!(
        SPIN_VERTEX_SHADER.contains("radians(transform.elapsed * 30.0)"),
        "Spin shader should rotate 30 degrees per second of elapsed time"
    );
    assert!(SPIN_VERTEX_SHADER.contains("transform.projection * transform.view * transform.model"));
}

#[test]
fn test_vertex_shaders_share_uniform_block() {
    let block = |source: &str| {
        let start = source.find("struct Transform").unwrap();
        let end = start + source[start..].find('}').unwrap();
        source[start..end].to_string()
    };
    assert_eq!(block(SPIN_VERTEX_SHADER), block(TRANSFORM_VERTEX_SHADER));
}
